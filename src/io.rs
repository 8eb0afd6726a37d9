//! CSV loading and saving for listing tables

use std::fs::File;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::{debug, info};

use crate::error::{PipelineError, Result};

/// Name of the positional index column written in front of saved tables.
pub const INDEX_COLUMN: &str = "index";

pub trait DataLoader {
    fn load_data(&self) -> Result<DataFrame>;
}

pub trait DataSaver {
    fn save_data(&self, data: &DataFrame) -> Result<()>;
}

pub(crate) fn check_extension(path: &Path, extension: &str, expected: &'static str) -> Result<()> {
    if path.extension().and_then(|e| e.to_str()) != Some(extension) {
        return Err(PipelineError::InvalidExtension {
            path: path.to_path_buf(),
            expected,
        });
    }
    Ok(())
}

/// Field values read as missing, alongside blank fields.
pub const NA_VALUES: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(value: &str) -> bool {
    value.trim().is_empty() || NA_VALUES.contains(&value)
}

fn blanks_as_nulls(df: &DataFrame) -> Result<DataFrame> {
    let columns = df
        .get_columns()
        .iter()
        .map(|s| {
            let values: Vec<Option<&str>> = s
                .utf8()?
                .into_iter()
                .map(|v| v.filter(|v| !is_missing(v)))
                .collect();
            Ok(Series::new(s.name(), values))
        })
        .collect::<Result<Vec<Series>>>()?;
    Ok(DataFrame::new(columns)?)
}

/// Reads a CSV file with every column kept as text.
pub struct CsvDataLoader {
    input_filename: PathBuf,
    dropna: bool,
}

impl CsvDataLoader {
    pub fn new(input_filename: impl Into<PathBuf>) -> Self {
        Self {
            input_filename: input_filename.into(),
            dropna: false,
        }
    }

    /// Drop every row holding a null after loading.
    pub fn with_dropna(mut self, dropna: bool) -> Self {
        self.dropna = dropna;
        self
    }

    pub fn path(&self) -> &Path {
        &self.input_filename
    }
}

impl DataLoader for CsvDataLoader {
    fn load_data(&self) -> Result<DataFrame> {
        check_extension(&self.input_filename, "csv", "CSV")?;

        if !self.input_filename.exists() {
            return Err(PipelineError::NotFound(self.input_filename.clone()));
        }

        // Schema inference over zero rows reads every column as Utf8
        let df = CsvReader::from_path(&self.input_filename)?
            .has_header(true)
            .infer_schema(Some(0))
            .finish()?;
        let df = blanks_as_nulls(&df)?;

        info!(
            "Loaded {} rows and {} columns from {}",
            df.height(),
            df.width(),
            self.input_filename.display()
        );

        if self.dropna {
            let before = df.height();
            let df = df.drop_nulls::<String>(None)?;
            debug!("Dropped {} rows with missing values", before - df.height());
            return Ok(df);
        }
        Ok(df)
    }
}

/// Writes a table to CSV, prefixed by a positional index column.
pub struct CsvDataSaver {
    output_filename: PathBuf,
}

impl CsvDataSaver {
    pub fn new(output_filename: impl Into<PathBuf>) -> Self {
        Self {
            output_filename: output_filename.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.output_filename
    }
}

impl DataSaver for CsvDataSaver {
    fn save_data(&self, data: &DataFrame) -> Result<()> {
        check_extension(&self.output_filename, "csv", "CSV")?;

        let data = if data.get_column_names().contains(&INDEX_COLUMN) {
            data.drop(INDEX_COLUMN)?
        } else {
            data.clone()
        };
        let mut data = data.with_row_count(INDEX_COLUMN, None)?;

        let mut file = File::create(&self.output_filename)?;
        CsvWriter::new(&mut file)
            .has_header(true)
            .finish(&mut data)?;

        info!(
            "Saved {} rows to {}",
            data.height(),
            self.output_filename.display()
        );
        Ok(())
    }
}
