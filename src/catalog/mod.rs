//! Static catalog of runnable actors.
//!
//! The catalog is read once at startup from a JSON array and never mutated.
//! It is shared between handlers as an `Arc<Catalog>`.
//!
//! # Example
//!
//! ```rust
//! use actor_console::catalog::Catalog;
//!
//! let catalog = Catalog::from_json(r#"[
//!     {"username": "apify", "name": "web-scraper", "title": "Web Scraper"}
//! ]"#).unwrap();
//!
//! assert_eq!(catalog.search("scraper").len(), 1);
//! assert!(catalog.search("instagram").is_empty());
//! ```

mod actor;

pub use actor::ActorDescriptor;

use std::path::Path;

use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::{ConsoleError, Result};

/// Maximum number of descriptors returned by a listing.
pub const DEFAULT_LISTING_CAP: usize = 500;

#[derive(Debug, Clone)]
pub struct Catalog {
    actors: Vec<ActorDescriptor>,
    listing_cap: usize,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Catalog {
    pub fn new(actors: Vec<ActorDescriptor>) -> Self {
        Self {
            actors,
            listing_cap: DEFAULT_LISTING_CAP,
        }
    }

    #[must_use]
    pub fn with_listing_cap(mut self, cap: usize) -> Self {
        self.listing_cap = cap;
        self
    }

    /// Parse a JSON array. Entries that are not objects are skipped.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let entries: Vec<Value> = serde_json::from_str(text)?;
        let total = entries.len();
        let actors: Vec<ActorDescriptor> = entries
            .into_iter()
            .filter_map(|entry| match entry {
                Value::Object(fields) => Some(ActorDescriptor::from_fields(fields)),
                _ => None,
            })
            .collect();
        if actors.len() < total {
            warn!(skipped = total - actors.len(), "Skipped non-object catalog entries");
        }
        Ok(Self::new(actors))
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConsoleError::CatalogIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConsoleError::CatalogParse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Read the catalog, falling back to an empty one so the console still
    /// starts when the file is missing or broken.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::read(path) {
            Ok(catalog) => {
                info!(
                    name: "catalog.loaded",
                    path = %path.display(),
                    actors = catalog.len(),
                    "Actor catalog loaded"
                );
                catalog
            }
            Err(ConsoleError::CatalogIo { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                warn!(path = %path.display(), "Actor catalog not found, starting empty");
                Self::default()
            }
            Err(e) => {
                error!("Could not load actor catalog: {e}");
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// First descriptors in file order, up to the listing cap.
    pub fn list(&self) -> &[ActorDescriptor] {
        &self.actors[..self.actors.len().min(self.listing_cap)]
    }

    /// Descriptors whose title, description or a category contains `query`,
    /// ignoring case. An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&ActorDescriptor> {
        let needle = query.trim().to_lowercase();
        self.actors
            .iter()
            .filter(|a| needle.is_empty() || a.matches_lowercase(&needle))
            .take(self.listing_cap)
            .collect()
    }

    /// Look up by `username~name` (or `username/name`).
    pub fn get(&self, actor_id: &str) -> Option<&ActorDescriptor> {
        let wanted = actor_id.replacen('/', "~", 1);
        self.actors
            .iter()
            .find(|a| a.actor_id().as_deref() == Some(wanted.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn sample() -> Catalog {
        Catalog::from_json(
            &json!([
                {
                    "username": "apify",
                    "name": "web-scraper",
                    "title": "Web Scraper",
                    "description": "Crawls websites using Chrome",
                    "categories": ["DEVELOPER_TOOLS"]
                },
                {
                    "username": "compass",
                    "name": "crawler-google-places",
                    "title": "Google Maps Scraper",
                    "description": "Extract places",
                    "categories": ["LEAD_GENERATION", "TRAVEL"]
                },
                { "username": "x", "name": "no-title" }
            ])
            .to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_search_by_title_description_category() {
        let catalog = sample();
        assert_eq!(catalog.search("SCRAPER").len(), 2);
        assert_eq!(catalog.search("chrome").len(), 1);
        assert_eq!(catalog.search("travel")[0].name(), Some("crawler-google-places"));
    }

    #[test]
    fn test_search_no_match_is_empty() {
        assert!(sample().search("zzz-nothing").is_empty());
    }

    #[test]
    fn test_empty_query_matches_all() {
        assert_eq!(sample().search("  ").len(), 3);
    }

    #[test]
    fn test_list_is_capped() {
        let entries: Vec<Value> = (0..600)
            .map(|i| json!({"username": "u", "name": format!("a{i}")}))
            .collect();
        let catalog = Catalog::from_json(&Value::Array(entries).to_string()).unwrap();

        assert_eq!(catalog.len(), 600);
        assert_eq!(catalog.list().len(), DEFAULT_LISTING_CAP);
        assert_eq!(catalog.list()[0].name(), Some("a0"));
        assert_eq!(catalog.search("").len(), DEFAULT_LISTING_CAP);
        assert_eq!(catalog.clone().with_listing_cap(3).list().len(), 3);
    }

    #[test]
    fn test_get_by_actor_id() {
        let catalog = sample();
        assert!(catalog.get("apify~web-scraper").is_some());
        assert!(catalog.get("apify/web-scraper").is_some());
        assert!(catalog.get("apify~missing").is_none());
    }

    #[test]
    fn test_non_object_entries_are_skipped() {
        let catalog = Catalog::from_json(r#"[{"name":"a"}, 3, "x", null]"#).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::load_or_empty(dir.path().join("absent.json"));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_malformed_file_loads_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        assert!(matches!(
            Catalog::read(file.path()),
            Err(ConsoleError::CatalogParse { .. })
        ));
        assert!(Catalog::load_or_empty(file.path()).is_empty());
    }
}
