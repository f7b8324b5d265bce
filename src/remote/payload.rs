//! Typed view over run payloads returned by the remote API.
//!
//! The remote owns these schemas, so nothing here assumes a field exists.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Remote run status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Ready,
    Running,
    Succeeded,
    Failed,
    Aborted,
    TimedOut,
    /// Status field absent or not a string. Never sent by the remote.
    Unknown,
    /// Any other value the remote reports.
    Other(String),
}

impl RunStatus {
    /// Parse a wire value. `None` maps to [`RunStatus::Unknown`].
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => Self::Unknown,
            Some("READY") => Self::Ready,
            Some("RUNNING") => Self::Running,
            Some("SUCCEEDED") => Self::Succeeded,
            Some("FAILED") => Self::Failed,
            Some("ABORTED") => Self::Aborted,
            Some("TIMED-OUT") => Self::TimedOut,
            Some("UNKNOWN") => Self::Unknown,
            Some(other) => Self::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Ready => "READY",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Aborted => "ABORTED",
            Self::TimedOut => "TIMED-OUT",
            Self::Unknown => "UNKNOWN",
            Self::Other(s) => s,
        }
    }

    /// Whether the run is still in flight and should be polled again.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Ready | Self::Running)
    }

    /// Whether no further state change is expected.
    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RunStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Fields the run lifecycle reads from a run payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSnapshot {
    pub id: Option<String>,
    pub status: RunStatus,
    pub default_dataset_id: Option<String>,
}

impl RunSnapshot {
    /// Read a run object out of a response body.
    ///
    /// The remote wraps run objects in a `{"data": {...}}` envelope; a body
    /// that already carries `id` or `status` at the top level is read as is.
    pub fn from_body(body: &Value) -> Self {
        let run = run_object(body);
        Self {
            id: string_field(run, "id"),
            status: RunStatus::parse(run.get("status").and_then(Value::as_str)),
            default_dataset_id: string_field(run, "defaultDatasetId"),
        }
    }
}

fn run_object(body: &Value) -> &Value {
    if body.get("id").is_some() || body.get("status").is_some() {
        return body;
    }
    match body.get("data") {
        Some(inner) if inner.is_object() => inner,
        _ => body,
    }
}

fn string_field(obj: &Value, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}
