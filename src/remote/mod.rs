//! Remote execution API boundary.
//!
//! Three logical calls are exposed through the [`RemoteApi`] trait: start a
//! run, read a run's status, and read a page of dataset items. Every call
//! resolves to an [`ApiOutcome`]; transport failures are folded into the
//! outcome rather than returned as errors so callers can relay them verbatim.
//!
//! # Wire shape
//!
//! ```json
//! { "status": 201, "data": { "data": { "id": "HG7ML7M8z78YcAPEB" } } }
//! { "error": "error sending request" }
//! ```

mod client;
mod payload;

pub use client::ApifyClient;
pub use payload::{RunSnapshot, RunStatus};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum number of dataset items requested per fetch.
pub const DATASET_PAGE_LIMIT: usize = 10;

/// Result of one call to the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiOutcome {
    /// The remote answered. `data` is the parsed JSON body, or the raw body
    /// as a string when it was not valid JSON.
    Response {
        /// HTTP status code returned by the remote.
        status: u16,
        /// Response body.
        data: Value,
    },
    /// No response arrived (DNS, refused connection, timeout).
    TransportError {
        /// Human-readable failure message.
        error: String,
    },
}

impl ApiOutcome {
    /// Build a response outcome from a raw body, keeping non-JSON bodies as text.
    pub fn from_body(status: u16, body: &str) -> Self {
        let data =
            serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_owned()));
        Self::Response { status, data }
    }

    /// Build a transport error outcome.
    pub fn transport(error: impl Into<String>) -> Self {
        Self::TransportError {
            error: error.into(),
        }
    }

    /// Response body, if the remote answered.
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Response { data, .. } => Some(data),
            Self::TransportError { .. } => None,
        }
    }

    /// HTTP status code, if the remote answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            Self::TransportError { .. } => None,
        }
    }

    /// Whether no response was received.
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::TransportError { .. })
    }
}

/// Calls against the remote execution API.
#[async_trait]
pub trait RemoteApi: Send + Sync + std::fmt::Debug {
    /// Start a run of `actor_id` (`username~name`) with `input` as the body.
    async fn start_run(&self, actor_id: &str, input: &Value) -> ApiOutcome;

    /// Read the current state of a run.
    async fn get_run_status(&self, run_id: &str) -> ApiOutcome;

    /// Read at most [`DATASET_PAGE_LIMIT`] items of a dataset.
    async fn get_dataset_items(&self, dataset_id: &str) -> ApiOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_body_is_parsed() {
        let outcome = ApiOutcome::from_body(200, r#"{"data":{"id":"abc"}}"#);
        assert_eq!(outcome.status_code(), Some(200));
        assert_eq!(outcome.data(), Some(&json!({"data": {"id": "abc"}})));
    }

    #[test]
    fn test_non_json_body_is_kept_as_text() {
        let outcome = ApiOutcome::from_body(502, "<html>Bad Gateway</html>");
        assert_eq!(
            outcome,
            ApiOutcome::Response {
                status: 502,
                data: Value::String("<html>Bad Gateway</html>".into()),
            }
        );
    }

    #[test]
    fn test_empty_body_is_empty_string() {
        let outcome = ApiOutcome::from_body(204, "");
        assert_eq!(outcome.data(), Some(&Value::String(String::new())));
    }

    #[test]
    fn test_wire_shapes() {
        let ok = serde_json::to_value(ApiOutcome::from_body(201, "[1,2]")).unwrap();
        assert_eq!(ok, json!({"status": 201, "data": [1, 2]}));

        let err = serde_json::to_value(ApiOutcome::transport("connection refused")).unwrap();
        assert_eq!(err, json!({"error": "connection refused"}));
        assert!(ApiOutcome::transport("x").is_transport_error());
    }
}
