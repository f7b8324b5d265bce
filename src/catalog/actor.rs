use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of the actor catalog.
///
/// The catalog is third-party data, so the descriptor keeps the original JSON
/// object and exposes the fields the console reads through accessors that
/// tolerate absent or mistyped values. Serializing returns the object as it
/// was read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorDescriptor {
    fields: Map<String, Value>,
}

impl ActorDescriptor {
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn username(&self) -> Option<&str> {
        self.str_field("username")
    }

    pub fn name(&self) -> Option<&str> {
        self.str_field("name")
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    pub fn description(&self) -> Option<&str> {
        self.str_field("description")
    }

    /// Documentation link.
    pub fn url(&self) -> Option<&str> {
        self.str_field("url")
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.fields
            .get("categories")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }

    /// `stats.totalRuns`.
    pub fn total_runs(&self) -> Option<u64> {
        self.fields
            .get("stats")
            .and_then(|s| s.get("totalRuns"))
            .and_then(Value::as_u64)
    }

    /// Remote identifier, `username~name`.
    pub fn actor_id(&self) -> Option<String> {
        Some(format!("{}~{}", self.username()?, self.name()?))
    }

    /// Case-insensitive substring match on title, description or any category.
    /// `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        let hit = |s: &str| s.to_lowercase().contains(needle);
        self.title().is_some_and(hit)
            || self.description().is_some_and(hit)
            || self.categories().any(hit)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

impl fmt::Display for ActorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.title().or(self.name()).unwrap_or("(untitled)");
        match self.actor_id() {
            Some(id) => write!(f, "{label} [{id}]"),
            None => f.write_str(label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(value: Value) -> ActorDescriptor {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_accessors() {
        let actor = descriptor(json!({
            "username": "apify",
            "name": "web-scraper",
            "title": "Web Scraper",
            "description": "Crawls arbitrary websites",
            "categories": ["DEVELOPER_TOOLS", "AUTOMATION"],
            "url": "https://apify.com/apify/web-scraper",
            "stats": { "totalRuns": 12345 }
        }));

        assert_eq!(actor.actor_id().as_deref(), Some("apify~web-scraper"));
        assert_eq!(actor.title(), Some("Web Scraper"));
        assert_eq!(actor.total_runs(), Some(12345));
        assert_eq!(
            actor.categories().collect::<Vec<_>>(),
            ["DEVELOPER_TOOLS", "AUTOMATION"]
        );
        assert_eq!(actor.to_string(), "Web Scraper [apify~web-scraper]");
    }

    #[test]
    fn test_mistyped_fields_read_as_absent() {
        let actor = descriptor(json!({
            "username": 7,
            "title": null,
            "categories": "SCRAPING",
            "stats": { "totalRuns": "many" }
        }));

        assert!(actor.actor_id().is_none());
        assert!(actor.title().is_none());
        assert_eq!(actor.categories().count(), 0);
        assert!(actor.total_runs().is_none());
        assert_eq!(actor.to_string(), "(untitled)");
    }

    #[test]
    fn test_serializes_every_original_field() {
        let original = json!({
            "username": "apify",
            "name": "web-scraper",
            "title": null,
            "pictureUrl": "https://example.com/p.png",
            "stats": { "totalRuns": 1, "totalUsers": 2 }
        });
        let actor = descriptor(original.clone());
        assert_eq!(serde_json::to_value(&actor).unwrap(), original);
    }

    #[test]
    fn test_serialization_keeps_key_order() {
        let text = r#"{"username":"apify","name":"web-scraper","title":"Web Scraper"}"#;
        let actor: ActorDescriptor = serde_json::from_str(text).unwrap();
        assert_eq!(serde_json::to_string(&actor).unwrap(), text);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let actor = descriptor(json!({
            "title": "Google Maps Extractor",
            "description": "Reviews and places",
            "categories": ["LEAD_GENERATION"]
        }));
        assert!(actor.matches_lowercase("maps"));
        assert!(actor.matches_lowercase("places"));
        assert!(actor.matches_lowercase("lead_gen"));
        assert!(!actor.matches_lowercase("instagram"));
    }
}
