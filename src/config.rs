use bon::Builder;
use std::time::Duration;

pub const DEFAULT_SERVER_URL: &str = "https://opendata.dwd.de";
pub const DEFAULT_CLIMATE_BASE_PATH: &str = "climate_environment/CDC/observations_germany/climate/";
pub const DEFAULT_TREE_PAGE_PATH: &str = "weather/tree.html";

/// Server locations and limits used by [`crate::Dwd`].
///
/// # Examples
///
/// ```
/// use dwd_opendata::DwdConfig;
/// use std::time::Duration;
///
/// let config = DwdConfig::builder()
///     .tree_max_age(Duration::from_secs(24 * 3600))
///     .build();
/// assert_eq!(config.server_url, "https://opendata.dwd.de");
/// ```
#[derive(Debug, Clone, Builder)]
pub struct DwdConfig {
    /// Root of the open-data server. Defaults to `https://opendata.dwd.de`.
    #[builder(into, default = DEFAULT_SERVER_URL.to_string())]
    pub server_url: String,
    /// Folder holding the `{resolution}/{quantity}/` product folders.
    #[builder(into, default = DEFAULT_CLIMATE_BASE_PATH.to_string())]
    pub climate_base_path: String,
    /// Page listing every folder of the server, used to build the folder tree cache.
    #[builder(into, default = DEFAULT_TREE_PAGE_PATH.to_string())]
    pub tree_page_path: String,
    /// The folder tree cache is rebuilt once it is older than this. Defaults to 7 days.
    #[builder(default = Duration::from_secs(7 * 24 * 3600))]
    pub tree_max_age: Duration,
    /// Timeout of a single HTTP request. Defaults to 120 seconds.
    #[builder(default = Duration::from_secs(120))]
    pub http_timeout: Duration,
}

impl Default for DwdConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
