//! The folder tree cache: a flat JSON list of every folder on the server, so product
//! folders can be found without crawling.

pub mod error;

use crate::transport::Transport;
use crate::tree::error::TreeError;
use crate::utils::html_links;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const TREE_FILE_NAME: &str = "dwd_tree.json";

/// One folder of the server, e.g.
/// `{"path": "climate_environment/CDC/observations_germany/climate/10_minutes/wind/", "folder": "wind"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderEntry {
    /// Path relative to the server root.
    pub path: String,
    /// Name of the folder itself.
    pub folder: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderTree {
    entries: Vec<FolderEntry>,
}

impl FolderTree {
    pub fn new(entries: Vec<FolderEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[FolderEntry] {
        &self.entries
    }

    /// Finds folders by keyword.
    ///
    /// A keyword containing `/` or `\` is matched as a substring of the path. Otherwise
    /// it has to equal the folder name when `unique` is set, or be contained in it.
    pub fn search(&self, keyword: &str, unique: bool) -> Vec<&FolderEntry> {
        let by_path = keyword.contains('/') || keyword.contains('\\');
        self.entries
            .iter()
            .filter(|entry| {
                if by_path {
                    entry.path.contains(keyword)
                } else if unique {
                    entry.folder == keyword
                } else {
                    entry.folder.contains(keyword)
                }
            })
            .collect()
    }

    /// The folder whose path ends with `product_path`.
    pub fn product_folder(&self, product_path: &str) -> Result<&FolderEntry, TreeError> {
        self.search(product_path, false)
            .into_iter()
            .filter(|entry| entry.path.ends_with(product_path))
            .min_by_key(|entry| entry.path.len())
            .ok_or_else(|| TreeError::ProductNotFound(product_path.to_string()))
    }

    /// Reads the `<a href="PATH">FOLDER</a>` links of the server's tree page.
    ///
    /// `server_url` is stripped from absolute paths so entries are relative to the root.
    /// Links without text are skipped.
    pub fn parse_tree_page(html: &str, server_url: &str) -> Vec<FolderEntry> {
        let prefix = format!("{}/", server_url.trim_end_matches('/'));
        html_links(html)
            .into_iter()
            .filter(|(_, folder)| !folder.is_empty())
            .map(|(target, folder)| {
                let path = target
                    .strip_prefix(prefix.as_str())
                    .map(str::to_string)
                    .unwrap_or(target);
                FolderEntry { path, folder }
            })
            .collect()
    }

    /// Downloads and parses the tree page at `tree_path`.
    pub fn build<T: Transport>(
        transport: &T,
        tree_path: &str,
        server_url: &str,
    ) -> Result<Self, TreeError> {
        info!("Building folder tree from {}", tree_path);
        let bytes = transport.fetch(tree_path)?;
        let html = String::from_utf8_lossy(&bytes);
        let entries = Self::parse_tree_page(&html, server_url);
        if entries.is_empty() {
            return Err(TreeError::EmptyTree(tree_path.to_string()));
        }
        info!("Folder tree holds {} folders", entries.len());
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self, TreeError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| TreeError::CacheRead(path.to_path_buf(), e))?;
        let entries: Vec<FolderEntry> = serde_json::from_str(&text)
            .map_err(|e| TreeError::CacheDecode(path.to_path_buf(), e))?;
        Ok(Self { entries })
    }

    /// Overwrites `path` with the tree as a JSON array.
    pub fn save(&self, path: &Path) -> Result<(), TreeError> {
        let text = serde_json::to_string_pretty(&self.entries).map_err(TreeError::CacheEncode)?;
        std::fs::write(path, text).map_err(|e| TreeError::CacheWrite(path.to_path_buf(), e))
    }

    /// Loads the cache file, rebuilding it first when it is missing, unreadable or older
    /// than `max_age`.
    pub fn load_or_build<T: Transport>(
        transport: &T,
        cache_file: &Path,
        tree_path: &str,
        server_url: &str,
        max_age: Duration,
    ) -> Result<Self, TreeError> {
        if !is_stale(cache_file, max_age) {
            match Self::load(cache_file) {
                Ok(tree) => return Ok(tree),
                Err(e) => warn!("Rebuilding unreadable folder tree cache: {}", e),
            }
        }
        let tree = Self::build(transport, tree_path, server_url)?;
        tree.save(cache_file)?;
        info!("Cached folder tree to {:?}", cache_file);
        Ok(tree)
    }
}

fn is_stale(path: &Path, max_age: Duration) -> bool {
    if max_age.is_zero() {
        return true;
    }
    let Ok(modified) = std::fs::metadata(path).and_then(|m| m.modified()) else {
        return true;
    };
    // a timestamp in the future counts as fresh
    modified.elapsed().is_ok_and(|age| age > max_age)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::memory::MemoryTransport;

    const SERVER: &str = "https://opendata.dwd.de";

    const PAGE: &str = r#"<html><head></head><body>
<a href="https://opendata.dwd.de/">https://opendata.dwd.de</a><br>
<a href="https://opendata.dwd.de/climate_environment/CDC/observations_germany/climate/">climate</a><br>
<a href="https://opendata.dwd.de/climate_environment/CDC/observations_germany/climate/10_minutes/">10_minutes</a><br>
<a href="https://opendata.dwd.de/climate_environment/CDC/observations_germany/climate/10_minutes/wind/">wind</a><br>
<a href="https://opendata.dwd.de/climate_environment/CDC/observations_germany/climate/10_minutes/wind/historical/">historical</a><br>
<a href="https://opendata.dwd.de/climate_environment/CDC/observations_germany/climate/10_minutes/extreme_wind/">extreme_wind</a><br>
<a href="https://opendata.dwd.de/climate_environment/CDC/observations_germany/climate/hourly/wind/">wind</a><br>
</body></html>"#;

    fn tree() -> FolderTree {
        FolderTree::new(FolderTree::parse_tree_page(PAGE, SERVER))
    }

    #[test]
    fn parses_tree_page_relative_to_server() {
        let tree = tree();
        assert_eq!(tree.entries().len(), 7);
        assert_eq!(tree.entries()[0].path, "");
        assert_eq!(
            tree.entries()[3],
            FolderEntry {
                path: "climate_environment/CDC/observations_germany/climate/10_minutes/wind/"
                    .to_string(),
                folder: "wind".to_string(),
            }
        );
    }

    #[test]
    fn tree_links_keep_extra_attributes_and_decode_entities() {
        let page = r#"<a href="https://opendata.dwd.de/climate/" target="_blank">climate</a>
<a href='https://opendata.dwd.de/weather/'>weather</a>
<a href="https://opendata.dwd.de/a&amp;b/">a&amp;b</a>
<a href="https://opendata.dwd.de/empty/"></a>"#;
        let entries = FolderTree::parse_tree_page(page, SERVER);
        let folders: Vec<(&str, &str)> = entries
            .iter()
            .map(|e| (e.path.as_str(), e.folder.as_str()))
            .collect();
        assert_eq!(
            folders,
            vec![("climate/", "climate"), ("weather/", "weather"), ("a&b/", "a&b")]
        );
    }

    #[test]
    fn search_modes() {
        let tree = tree();
        assert_eq!(tree.search("wind", true).len(), 2);
        assert_eq!(tree.search("wind", false).len(), 3);
        let by_path = tree.search("10_minutes/wind/", true);
        assert_eq!(by_path.len(), 2);
        assert!(by_path.iter().all(|e| e.path.contains("10_minutes/wind/")));
        assert!(tree.search("10_minutes\\wind", false).is_empty());
    }

    #[test]
    fn product_folder_prefers_the_folder_itself() {
        let tree = tree();
        let entry = tree.product_folder("10_minutes/wind/").unwrap();
        assert_eq!(entry.folder, "wind");
        assert!(entry.path.ends_with("climate/10_minutes/wind/"));
        assert!(matches!(
            tree.product_folder("1_minute/solar/"),
            Err(TreeError::ProductNotFound(_))
        ));
    }

    #[test]
    fn cache_is_built_once_and_reused() {
        let dir = tempfile::tempdir().unwrap();
        let cache_file = dir.path().join(TREE_FILE_NAME);
        let mut transport = MemoryTransport::default();
        transport.insert("weather/tree.html", PAGE);

        let max_age = Duration::from_secs(3600);
        let built =
            FolderTree::load_or_build(&transport, &cache_file, "weather/tree.html", SERVER, max_age)
                .unwrap();
        assert!(cache_file.exists());
        let loaded =
            FolderTree::load_or_build(&transport, &cache_file, "weather/tree.html", SERVER, max_age)
                .unwrap();
        assert_eq!(built, loaded);
        assert_eq!(transport.fetched.borrow().len(), 1);
    }

    #[test]
    fn stale_or_corrupt_cache_is_rebuilt() {
        let dir = tempfile::tempdir().unwrap();
        let cache_file = dir.path().join(TREE_FILE_NAME);
        std::fs::write(&cache_file, "not json").unwrap();
        let mut transport = MemoryTransport::default();
        transport.insert("weather/tree.html", PAGE);

        let tree = FolderTree::load_or_build(
            &transport,
            &cache_file,
            "weather/tree.html",
            SERVER,
            Duration::from_secs(3600),
        )
        .unwrap();
        assert_eq!(tree.entries().len(), 7);

        FolderTree::load_or_build(
            &transport,
            &cache_file,
            "weather/tree.html",
            SERVER,
            Duration::ZERO,
        )
        .unwrap();
        assert_eq!(transport.fetched.borrow().len(), 2);
    }

    #[test]
    fn empty_tree_page_is_an_error() {
        let mut transport = MemoryTransport::default();
        transport.insert("weather/tree.html", "<html><body></body></html>");
        assert!(matches!(
            FolderTree::build(&transport, "weather/tree.html", SERVER),
            Err(TreeError::EmptyTree(_))
        ));
    }
}
