use thiserror::Error;

#[derive(Debug, Error)]
pub enum StationError {
    #[error("No stations listed in '{0}'")]
    NoStations(String),

    #[error("No station description file found in '{0}'")]
    MissingStationList(String),
}
