use crate::transport::error::TransportError;
use crate::transport::Transport;
use crate::utils::html_links;
use log::{info, warn};
use reqwest::blocking::{Client, Response};
use std::time::Duration;

/// Blocking HTTP access to an Apache-style file server such as `opendata.dwd.de`.
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::ClientBuild)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get(&self, url: String) -> Result<Response, TransportError> {
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| TransportError::NetworkRequest(url.clone(), e))?;
        match response.error_for_status() {
            Ok(resp) => Ok(resp),
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                Err(if let Some(status) = e.status() {
                    TransportError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    TransportError::NetworkRequest(url, e)
                })
            }
        }
    }
}

/// Targets of the links of a directory index, without parent links, sort links and
/// absolute URLs.
pub(crate) fn parse_index(html: &str) -> Vec<String> {
    html_links(html)
        .into_iter()
        .map(|(target, _)| target)
        .filter(|target| {
            !target.is_empty()
                && !target.starts_with("..")
                && !target.starts_with('?')
                && !target.starts_with('/')
                && !target.contains("://")
        })
        .collect()
}

impl Transport for HttpTransport {
    fn list(&self, path: &str) -> Result<Vec<String>, TransportError> {
        let folder = if path.ends_with('/') {
            path.to_string()
        } else {
            format!("{path}/")
        };
        let url = self.url(&folder);
        info!("Listing {}", url);
        let body = self.get(url.clone())?;
        let html = body.text().map_err(|e| TransportError::Body(url, e))?;
        Ok(parse_index(&html))
    }

    fn fetch(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        let url = self.url(path);
        info!("Downloading {}", url);
        let body = self.get(url.clone())?;
        let bytes = body.bytes().map_err(|e| TransportError::Body(url, e))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_apache_index() {
        let html = r#"<html><head><title>Index of /climate/10_minutes/wind/</title></head>
<body><h1>Index of /climate/10_minutes/wind/</h1><hr><pre><a href="../">../</a>
<a href="historical/">historical/</a>                                        10-Jan-2024 10:04       -
<a href="meta_data/">meta_data/</a>                                         10-Jan-2024 10:04       -
<a href="now/">now/</a>                                               10-Jan-2024 10:04       -
<a href="recent/">recent/</a>                                            10-Jan-2024 10:04       -
<a href="?C=M;O=A">Last modified</a>
</pre><hr></body></html>"#;
        assert_eq!(
            parse_index(html),
            vec!["historical/", "meta_data/", "now/", "recent/"]
        );
    }

    #[test]
    fn index_links_may_use_any_quoting_or_case() {
        let html = r#"<pre><a href='recent/'>recent/</a>
<A HREF="now/">now/</A>
<a href="/climate_environment/">up</a>
<a href="https://example.org/x/">elsewhere</a></pre>"#;
        assert_eq!(parse_index(html), vec!["recent/", "now/"]);
    }

    #[test]
    fn joins_urls_without_double_slashes() {
        let transport = HttpTransport::new("https://opendata.dwd.de/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            transport.url("/climate_environment/CDC/tree.html"),
            "https://opendata.dwd.de/climate_environment/CDC/tree.html"
        );
    }
}
