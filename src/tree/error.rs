use crate::transport::error::TransportError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Failed to read cache file '{0}'")]
    CacheRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write cache file '{0}'")]
    CacheWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to decode cache data from '{0}'")]
    CacheDecode(PathBuf, #[source] serde_json::Error),

    #[error("Failed to encode cache data")]
    CacheEncode(#[source] serde_json::Error),

    #[error("Failed to download the folder tree")]
    Download(#[from] TransportError),

    #[error("The folder tree page '{0}' lists no folders")]
    EmptyTree(String),

    #[error("No folder matching '{0}' in the folder tree")]
    ProductNotFound(String),
}
