//! Access to the open-data server: listing folders and fetching files.

pub mod error;
pub mod http;

use crate::transport::error::TransportError;

/// The two remote capabilities everything else is built on.
///
/// Paths are relative to the server root and use `/` separators, e.g.
/// `climate_environment/CDC/observations_germany/climate/10_minutes/wind/recent/`.
pub trait Transport {
    /// Entry names directly below the folder `path`. Sub-folders end with `/`.
    fn list(&self, path: &str) -> Result<Vec<String>, TransportError>;

    /// Raw bytes of the file at `path`.
    fn fetch(&self, path: &str) -> Result<Vec<u8>, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn list(&self, path: &str) -> Result<Vec<String>, TransportError> {
        (**self).list(path)
    }

    fn fetch(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        (**self).fetch(path)
    }
}
