use crate::stations::error::StationError;
use crate::transport::error::TransportError;
use crate::tree::error::TreeError;
use crate::types::error::TimeSpanError;
use crate::weather_data::error::{HeightError, WeatherDataError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DwdError {
    #[error(transparent)]
    TimeSpan(#[from] TimeSpanError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    WeatherData(#[from] WeatherDataError),

    #[error(transparent)]
    Station(#[from] StationError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Height(#[from] HeightError),

    #[error("No vintage of '{folder}' holds data for {span}")]
    NoVintageCoversSpan { folder: String, span: String },

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),
}
