use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherDataError {
    #[error("Failed to open zip archive '{0}'")]
    ZipArchive(String, #[source] zip::result::ZipError),

    #[error("No product table found in archive '{0}'")]
    MissingProductFile(String),

    #[error("Failed to read '{entry}' from archive '{archive}'")]
    ProductRead {
        archive: String,
        entry: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Product table in '{0}' has no header line")]
    EmptyTable(String),

    #[error("Parsing error processing product table of '{archive}'")]
    CsvReadPolars {
        archive: String,
        #[source]
        source: PolarsError,
    },

    #[error("Missing required column '{column}' in '{archive}'")]
    MissingColumnError { archive: String, column: String },

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),

    #[error("No archives for station '{station}' in '{folder}'")]
    NoArchives { station: String, folder: String },

    #[error("No vintage frames to merge")]
    NoFrames,

    #[error("Requested span {0} is empty")]
    EmptySpan(String),

    #[error("Grid step must be a positive number of minutes, got {0}")]
    InvalidStep(i64),
}

#[derive(Debug, Error)]
pub enum HeightError {
    #[error("Height {0} m is invalid, heights must be positive and finite")]
    Height(f64),

    #[error("Roughness length {z0} m is invalid for heights {h1} m and {h2} m")]
    Roughness { z0: f64, h1: f64, h2: f64 },

    #[error("Power law exponent {0} is not finite")]
    Exponent(f64),

    #[error("Column '{0}' not found")]
    MissingColumn(String),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
