//! On-disk cache of ASN prefix pages.
//!
//! Pages are stored as `<cache_dir>/<ASN>_prefixes.html`. A page younger than
//! `max_age` is fresh; older pages are kept as a fallback for failed refreshes.

use chrono::{DateTime, Utc};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PageCache {
    dir: PathBuf,
    max_age: Duration,
}

impl PageCache {
    /// Open a cache rooted at `dir`, creating the directory if needed.
    pub fn new(dir: &Path, max_age: Duration) -> Result<PageCache, Box<dyn Error>> {
        std::fs::create_dir_all(dir)
            .map_err(|e| format!("Error creating cache dir {}: {e}", dir.display()))?;
        Ok(PageCache {
            dir: dir.to_path_buf(),
            max_age,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cache file for an ASN. Anything but ASCII alphanumerics is dropped from the name.
    pub fn path_for(&self, asn: &str) -> PathBuf {
        let name: String = asn.chars().filter(char::is_ascii_alphanumeric).collect();
        self.dir.join(format!("{name}_prefixes.html"))
    }

    /// Cached page for `asn` if it is younger than `max_age`.
    pub fn read_fresh(&self, asn: &str) -> Option<String> {
        let path = self.path_for(asn);
        let modified = std::fs::metadata(&path).and_then(|m| m.modified()).ok()?;
        // A timestamp in the future counts as age zero.
        let age = modified.elapsed().unwrap_or_default();
        if age >= self.max_age {
            log::debug!(
                "Cache for {asn} is stale, written {}",
                DateTime::<Utc>::from(modified).format("%Y-%m-%d %H:%M:%S")
            );
            return None;
        }
        let html = std::fs::read_to_string(&path).ok()?;
        log::info!("Using cached prefixes page for {asn}");
        Some(html)
    }

    /// Cached page for `asn` regardless of age.
    pub fn read_any(&self, asn: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(asn)).ok()
    }

    pub fn write(&self, asn: &str, html: &str) -> Result<(), Box<dyn Error>> {
        let path = self.path_for(asn);
        log::debug!("Writing cache file: {}", path.display());
        std::fs::write(&path, html)
            .map_err(|e| format!("Error writing cache file {}: {e}", path.display()))?;
        Ok(())
    }

    /// Remove every cached page and recreate the empty directory.
    pub fn clear(&self) -> Result<(), Box<dyn Error>> {
        log::info!("Clearing cache dir {}", self.dir.display());
        if self.dir.exists() {
            std::fs::remove_dir_all(&self.dir)
                .map_err(|e| format!("Error removing cache dir {}: {e}", self.dir.display()))?;
        }
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| format!("Error creating cache dir {}: {e}", self.dir.display()))?;
        Ok(())
    }
}
