//! One-shot CLI commands that reuse the server's building blocks.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde_json::Value;

use crate::catalog::{ActorDescriptor, Catalog};
use crate::config::AppConfig;
use crate::error::ConsoleError;
use crate::remote::{ApifyClient, RemoteApi};
use crate::tracker::{PollPolicy, RunRequest, RunTracker};

/// Resolve the run input: a file, an inline string, or `{}` when neither is given.
pub fn parse_input(inline: Option<&str>, file: Option<&Path>) -> anyhow::Result<Value> {
    let text = match (inline, file) {
        (Some(text), _) => text.to_owned(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display()))?,
        (None, None) => return Ok(Value::Object(serde_json::Map::new())),
    };
    Ok(serde_json::from_str(&text).map_err(ConsoleError::InvalidInput)?)
}

/// Start a run, follow it to the end and print the outcome as JSON.
///
/// Returns whether the run succeeded.
pub async fn run_actor(
    config: &AppConfig,
    actor_id: &str,
    input: Option<&str>,
    input_file: Option<&Path>,
) -> anyhow::Result<bool> {
    let input = parse_input(input, input_file)?;
    let remote: Arc<dyn RemoteApi> = Arc::new(ApifyClient::new(&config.remote)?);
    let tracker = RunTracker::new(remote, PollPolicy::from(&config.polling));

    match tracker.run(&RunRequest::new(actor_id, input)).await {
        Ok(outcome) => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(outcome.is_success())
        }
        Err(rejected) => {
            tracing::error!(actor_id, "Run was not started");
            println!("{}", serde_json::to_string_pretty(&rejected)?);
            Ok(false)
        }
    }
}

/// Print catalog entries matching `query`, one per line.
pub fn list_actors(config: &AppConfig, query: Option<&str>, limit: usize) {
    let catalog = Catalog::load_or_empty(&config.catalog.path);
    for actor in catalog.search(query.unwrap_or_default()).into_iter().take(limit) {
        println!("{}", listing_line(actor));
    }
}

fn listing_line(actor: &ActorDescriptor) -> String {
    let mut line = actor.to_string();
    if let Some(runs) = actor.total_runs() {
        line.push_str(&format!("  ({runs} runs)"));
    }
    if let Some(url) = actor.url() {
        line.push_str("  ");
        line.push_str(url);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_input_defaults_to_empty_object() {
        assert_eq!(parse_input(None, None).unwrap(), json!({}));
    }

    #[test]
    fn test_inline_input() {
        assert_eq!(
            parse_input(Some(r#"{"maxItems": 3}"#), None).unwrap(),
            json!({"maxItems": 3})
        );
    }

    #[test]
    fn test_file_input() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"startUrls": [{{"url": "https://example.com"}}]}}"#).unwrap();

        let input = parse_input(None, Some(file.path())).unwrap();
        assert_eq!(input["startUrls"][0]["url"], "https://example.com");
    }

    #[test]
    fn test_invalid_input_is_reported() {
        let err = parse_input(Some("{oops"), None).unwrap_err();
        assert!(err.to_string().starts_with("Invalid JSON input"));
    }

    #[test]
    fn test_listing_line_shows_runs_and_docs_link() {
        let actor: ActorDescriptor = serde_json::from_value(json!({
            "username": "apify",
            "name": "web-scraper",
            "title": "Web Scraper",
            "url": "https://apify.com/apify/web-scraper",
            "stats": { "totalRuns": 1200 }
        }))
        .unwrap();
        assert_eq!(
            listing_line(&actor),
            "Web Scraper [apify~web-scraper]  (1200 runs)  https://apify.com/apify/web-scraper"
        );

        let bare: ActorDescriptor = serde_json::from_value(json!({"title": "Bare"})).unwrap();
        assert_eq!(listing_line(&bare), "Bare");
    }

    #[test]
    fn test_missing_input_file() {
        let err = parse_input(None, Some(Path::new("/definitely/not/here.json"))).unwrap_err();
        assert!(err.to_string().contains("failed to read input file"));
    }
}
