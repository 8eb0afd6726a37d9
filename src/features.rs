//! Feature mapping shared by training and inference

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::encoding::{Neighbourhood, RoomType};
use crate::error::{PipelineError, Result};

/// Feature order expected by the classifier.
pub const FEATURE_COLUMNS: [&str; 5] = [
    "accommodates",
    "room_type",
    "bathrooms",
    "bedrooms",
    "neighbourhood",
];

pub const TARGET_COLUMN: &str = "category";

const MISSING_LABEL: &str = "<missing>";

fn encode_column<F>(df: &DataFrame, name: &str, domain: &'static str, encode: F) -> Result<Series>
where
    F: Fn(&str) -> Result<i64>,
{
    let labels = df
        .column(name)
        .map_err(|_| PipelineError::MissingColumn(name.to_string()))?
        .cast(&DataType::Utf8)?;

    let codes = labels
        .utf8()?
        .into_iter()
        .map(|label| match label {
            Some(label) => encode(label),
            None => Err(PipelineError::UnknownLabel {
                domain,
                label: MISSING_LABEL.to_string(),
            }),
        })
        .collect::<Result<Vec<i64>>>()?;

    Ok(Series::new(name, codes))
}

/// Replaces the `room_type` and `neighbourhood` labels with their codes.
///
/// Any label outside the encoding tables fails the whole table.
pub fn encode_table(mut df: DataFrame) -> Result<DataFrame> {
    let room_types = encode_column(&df, "room_type", RoomType::DOMAIN, |label| {
        RoomType::from_label(label).map(RoomType::code)
    })?;
    let neighbourhoods = encode_column(&df, "neighbourhood", Neighbourhood::DOMAIN, |label| {
        Neighbourhood::from_label(label).map(Neighbourhood::code)
    })?;

    df.with_column(room_types)?;
    df.with_column(neighbourhoods)?;
    Ok(df)
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let values = df
        .column(name)
        .map_err(|_| PipelineError::MissingColumn(name.to_string()))?
        .cast(&DataType::Float64)?;
    let values = values.f64()?;

    if values.null_count() > 0 {
        return Err(PipelineError::InvalidInput(format!(
            "column {} holds non-numeric values",
            name
        )));
    }
    Ok(values.into_no_null_iter().collect())
}

/// Rows of [`FEATURE_COLUMNS`] from an encoded table.
pub fn feature_rows(df: &DataFrame) -> Result<Vec<Vec<f64>>> {
    let columns = FEATURE_COLUMNS
        .iter()
        .map(|name| float_column(df, name))
        .collect::<Result<Vec<_>>>()?;

    Ok((0..df.height())
        .map(|row| columns.iter().map(|column| column[row]).collect())
        .collect())
}

pub fn feature_matrix(df: &DataFrame) -> Result<DenseMatrix<f64>> {
    if df.height() == 0 {
        return Err(PipelineError::InvalidInput("no rows to build features from".to_string()));
    }
    Ok(DenseMatrix::from_2d_vec(&feature_rows(df)?))
}

/// Price category labels of an encoded table.
pub fn target_labels(df: &DataFrame) -> Result<Vec<u8>> {
    float_column(df, TARGET_COLUMN)?
        .into_iter()
        .map(|v| {
            if v.fract() == 0.0 && (0.0..=u8::MAX as f64).contains(&v) {
                Ok(v as u8)
            } else {
                Err(PipelineError::UnknownCode {
                    domain: "price category",
                    code: v as i64,
                })
            }
        })
        .collect()
}

/// One listing submitted for inference.
///
/// `beds`, `tv`, `elevator`, `internet`, `latitude` and `longitude` are
/// accepted but not part of [`FEATURE_COLUMNS`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingInput {
    pub id: i64,
    pub accommodates: i64,
    pub room_type: String,
    pub beds: i64,
    pub bedrooms: i64,
    pub bathrooms: f64,
    pub neighbourhood: String,
    pub tv: i64,
    pub elevator: i64,
    pub internet: i64,
    pub latitude: f64,
    pub longitude: f64,
}

impl ListingInput {
    pub fn feature_vector(&self) -> Result<Vec<f64>> {
        let room_type = RoomType::from_label(&self.room_type)?;
        let neighbourhood = Neighbourhood::from_label(&self.neighbourhood)?;

        Ok(vec![
            self.accommodates as f64,
            room_type.code() as f64,
            self.bathrooms,
            self.bedrooms as f64,
            neighbourhood.code() as f64,
        ])
    }
}
