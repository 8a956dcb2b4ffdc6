pub mod archive_filter;
pub mod coverage;
pub mod data_loader;
pub mod error;
pub mod height;
pub mod merge;
