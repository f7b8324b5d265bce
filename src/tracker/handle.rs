use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::remote::{RunSnapshot, RunStatus};

/// Request to start a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    /// `username~name`.
    #[serde(rename = "actorId")]
    pub actor_id: String,
    /// Actor input. Absent or `null` means `{}`.
    #[serde(default)]
    pub input: Option<Value>,
}

impl RunRequest {
    pub fn new(actor_id: impl Into<String>, input: Value) -> Self {
        Self {
            actor_id: actor_id.into(),
            input: Some(input),
        }
    }

    /// Body sent to the remote.
    pub fn input_body(&self) -> Value {
        match &self.input {
            None | Some(Value::Null) => Value::Object(serde_json::Map::new()),
            Some(v) => v.clone(),
        }
    }
}

/// Where a run is in its lifecycle, as far as this side knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunPhase {
    /// Start accepted, no status observed yet.
    Submitted,
    /// Last status reported by the remote.
    Observed(RunStatus),
}

impl RunPhase {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Submitted => "SUBMITTED",
            Self::Observed(status) => status.as_str(),
        }
    }
}

impl Serialize for RunPhase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Caller-owned handle for one run.
///
/// Polling takes `&mut RunHandle`, so polls for one handle never overlap.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunHandle {
    pub run_id: String,
    /// Known once a status payload reports it; only meaningful after SUCCEEDED.
    pub dataset_id: Option<String>,
    pub phase: RunPhase,
    pub polls: u32,
}

impl RunHandle {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            dataset_id: None,
            phase: RunPhase::Submitted,
            polls: 0,
        }
    }

    pub fn status(&self) -> Option<&RunStatus> {
        match &self.phase {
            RunPhase::Submitted => None,
            RunPhase::Observed(status) => Some(status),
        }
    }

    pub(crate) fn observe(&mut self, snapshot: &RunSnapshot) {
        self.phase = RunPhase::Observed(snapshot.status.clone());
        if snapshot.default_dataset_id.is_some() {
            self.dataset_id.clone_from(&snapshot.default_dataset_id);
        }
    }
}
