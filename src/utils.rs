use scraper::{Html, Selector};
use std::io;
use std::path::{Path, PathBuf};

const CACHE_DIR_NAME: &str = "dwd_opendata_cache";

pub fn get_cache_dir() -> Result<PathBuf, io::Error> {
    dirs::cache_dir()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine system cache directory",
            )
        })
        .map(|p| p.join(CACHE_DIR_NAME))
}

pub fn ensure_cache_dir_exists(path: &Path) -> Result<(), io::Error> {
    match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("Cache path exists but is not a directory: {}", path.display()),
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::info!("Creating cache directory: {}", path.display());
            std::fs::create_dir_all(path)
        }
        Err(e) => Err(e),
    }
}

/// ISO 8859-1 maps every byte to the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// `(href, text)` of every anchor carrying an `href`, in document order.
///
/// Attribute values and text come back with entities decoded; the text is trimmed.
pub(crate) fn html_links(html: &str) -> Vec<(String, String)> {
    let Ok(anchors) = Selector::parse("a[href]") else {
        log::warn!("Invalid anchor selector");
        return Vec::new();
    };
    let document = Html::parse_document(html);
    let links = document
        .select(&anchors)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            let text: String = a.text().collect();
            Some((href.trim().to_string(), text.trim().to_string()))
        })
        .collect();
    links
}
