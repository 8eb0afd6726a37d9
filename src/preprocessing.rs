//! Cleaning pipeline for raw listing tables.
//!
//! Turns the raw, all-text listings export into a typed table ready for
//! feature encoding. Rows that cannot be parsed are dropped rather than
//! imputed; [`CleaningReport`] keeps count of them per stage.

use polars::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::io::{DataLoader, DataSaver};

/// Columns kept from the raw table, in output order.
pub const KEEP_COLUMNS: [&str; 12] = [
    "id",
    "neighbourhood_group_cleansed",
    "property_type",
    "room_type",
    "latitude",
    "longitude",
    "accommodates",
    "bathrooms",
    "bedrooms",
    "beds",
    "amenities",
    "price",
];

/// Amenity keyword searched for in the free-text field, and the indicator
/// column it produces.
///
/// None of these columns feed the current feature set; they are kept for
/// models that want them.
pub const AMENITY_COLUMNS: [(&str, &str); 8] = [
    ("TV", "TV"),
    ("Internet", "Internet"),
    ("Air conditioning", "Air_conditioning"),
    ("Kitchen", "Kitchen"),
    ("Heating", "Heating"),
    ("Wifi", "Wifi"),
    ("Elevator", "Elevator"),
    ("Breakfast", "Breakfast"),
];

const BATHROOMS_TEXT: &str = "bathrooms_text";
const RAW_NEIGHBOURHOOD: &str = "neighbourhood_group_cleansed";

#[derive(Debug, Clone)]
pub struct CleaningConfig {
    /// Rows priced below this are dropped. Zero or negative disables the filter.
    pub remove_price_under: i64,
    /// Bin edges; bin `i` is `[price_bins[i], price_bins[i + 1])`.
    pub price_bins: Vec<f64>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            remove_price_under: 10,
            price_bins: vec![10.0, 90.0, 180.0, 400.0, f64::INFINITY],
        }
    }
}

/// Row counts observed while cleaning one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub rows_in: usize,
    pub dropped_missing: usize,
    pub dropped_price: usize,
    pub dropped_uncategorized: usize,
    pub rows_out: usize,
}

/// Extracts the bathroom count from text such as `"1.5 baths"`.
pub fn bathrooms_from_text(text: &str) -> Option<f64> {
    text.split(' ').next()?.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Extracts whole currency units from text such as `"$1,200.00"`.
pub fn price_from_text(text: &str) -> Option<i64> {
    let text = text.replace(',', "");
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Places `price` into one of the half-open bins described by `edges`.
pub fn price_category(price: i64, edges: &[f64]) -> Option<i64> {
    let price = price as f64;
    edges
        .windows(2)
        .position(|bin| price >= bin[0] && price < bin[1])
        .map(|i| i as i64)
}

// Counts may be written as "2" or "2.0"
fn parse_count(text: &str) -> Option<i64> {
    let value = text.trim().parse::<f64>().ok()?;
    if value < 0.0 || value.fract() != 0.0 {
        return None;
    }
    Some(value as i64)
}

fn parse_float(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_id(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}

fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map_err(|_| PipelineError::MissingColumn(name.to_string()))
}

// Columns may arrive typed when a cleaned table is fed back in
fn text_values(series: &Series) -> Result<Vec<Option<String>>> {
    let text = series.cast(&DataType::Utf8)?;
    Ok(text
        .utf8()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

fn parse_column<T, F>(df: &DataFrame, name: &str, parse: F) -> Result<Vec<Option<T>>>
where
    F: Fn(&str) -> Option<T>,
{
    Ok(text_values(require_column(df, name)?)?
        .into_iter()
        .map(|v| v.and_then(|v| parse(&v)))
        .collect())
}

fn keep_rows(df: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice("mask", keep);
    Ok(df.filter(&mask)?)
}

/// Cleans raw listings, reading and writing through the given collaborators.
pub struct ListingPreprocessor {
    loader: Box<dyn DataLoader>,
    saver: Box<dyn DataSaver>,
    config: CleaningConfig,
}

impl ListingPreprocessor {
    pub fn new(loader: Box<dyn DataLoader>, saver: Box<dyn DataSaver>) -> Self {
        Self {
            loader,
            saver,
            config: CleaningConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CleaningConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    pub fn load_data(&self) -> Result<DataFrame> {
        self.loader.load_data()
    }

    pub fn save_data(&self, data: &DataFrame) -> Result<()> {
        self.saver.save_data(data)
    }

    /// Load, clean and save in one pass.
    pub fn run(&self) -> Result<CleaningReport> {
        let raw = self.load_data()?;
        let (cleaned, report) = self.clean_with_report(raw)?;
        self.save_data(&cleaned)?;
        Ok(report)
    }

    pub fn clean(&self, data: DataFrame) -> Result<DataFrame> {
        self.clean_with_report(data).map(|(df, _)| df)
    }

    pub fn clean_with_report(&self, data: DataFrame) -> Result<(DataFrame, CleaningReport)> {
        if data.width() == 0 {
            return Err(PipelineError::InvalidInput(
                "Data not set. Please set the data before cleaning.".to_string(),
            ));
        }

        let mut report = CleaningReport {
            rows_in: data.height(),
            ..Default::default()
        };

        let data = self.preprocess_bathrooms_column(data)?;
        let data = self.preprocess_kept_columns(data)?;
        report.dropped_missing = report.rows_in - data.height();

        let before = data.height();
        let data = self.preprocess_price_column(data)?;
        report.dropped_price = before - data.height();

        let before = data.height();
        let data = self.preprocess_category_column(data)?;
        report.dropped_uncategorized = before - data.height();

        let data = self.preprocess_amenities_column(data)?;
        report.rows_out = data.height();

        info!(
            rows_in = report.rows_in,
            rows_out = report.rows_out,
            dropped_missing = report.dropped_missing,
            dropped_price = report.dropped_price,
            dropped_uncategorized = report.dropped_uncategorized,
            "Cleaned listings"
        );
        Ok((data, report))
    }

    fn preprocess_bathrooms_column(&self, mut data: DataFrame) -> Result<DataFrame> {
        let bathrooms = parse_column(&data, BATHROOMS_TEXT, bathrooms_from_text)?;

        if data.get_column_names().contains(&"bathrooms") {
            data = data.drop("bathrooms")?;
        }
        data.with_column(Series::new("bathrooms", bathrooms))?;
        Ok(data)
    }

    // Projects to KEEP_COLUMNS, types the numeric ones and drops incomplete rows
    fn preprocess_kept_columns(&self, data: DataFrame) -> Result<DataFrame> {
        for name in KEEP_COLUMNS {
            require_column(&data, name)?;
        }

        let mut cleaned = data.select(KEEP_COLUMNS)?;
        cleaned.rename(RAW_NEIGHBOURHOOD, "neighbourhood")?;

        let id = parse_column(&cleaned, "id", parse_id)?;
        cleaned.with_column(Series::new("id", id))?;
        for name in ["latitude", "longitude"] {
            let values = parse_column(&cleaned, name, parse_float)?;
            cleaned.with_column(Series::new(name, values))?;
        }
        for name in ["accommodates", "bedrooms", "beds"] {
            let values = parse_column(&cleaned, name, parse_count)?;
            cleaned.with_column(Series::new(name, values))?;
        }

        Ok(cleaned.drop_nulls::<String>(None)?)
    }

    fn preprocess_price_column(&self, mut data: DataFrame) -> Result<DataFrame> {
        let prices = parse_column(&data, "price", price_from_text)?;

        let floor = self.config.remove_price_under;
        let keep: Vec<bool> = prices
            .iter()
            .map(|p| match p {
                Some(p) => floor <= 0 || *p >= floor,
                None => false,
            })
            .collect();

        data.with_column(Series::new("price", prices))?;
        keep_rows(&data, &keep)
    }

    fn preprocess_category_column(&self, mut data: DataFrame) -> Result<DataFrame> {
        let categories: Vec<Option<i64>> = require_column(&data, "price")?
            .i64()?
            .into_iter()
            .map(|p| p.and_then(|p| price_category(p, &self.config.price_bins)))
            .collect();
        let keep: Vec<bool> = categories.iter().map(Option::is_some).collect();

        data.with_column(Series::new("category", categories))?;
        keep_rows(&data, &keep)
    }

    fn preprocess_amenities_column(&self, mut data: DataFrame) -> Result<DataFrame> {
        let amenities = text_values(require_column(&data, "amenities")?)?;

        for (keyword, column) in AMENITY_COLUMNS {
            let flags: Vec<i64> = amenities
                .iter()
                .map(|text| match text {
                    Some(text) if text.contains(keyword) => 1,
                    _ => 0,
                })
                .collect();
            data.with_column(Series::new(column, flags))?;
        }

        Ok(data.drop("amenities")?)
    }
}
