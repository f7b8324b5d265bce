//! Run lifecycle tracking.
//!
//! A run moves `SUBMITTED -> READY | RUNNING -> SUCCEEDED | FAILED | ABORTED |
//! TIMED-OUT`. The remote never pushes updates; [`RunTracker`] polls the run
//! status on a fixed interval, and once the run has succeeded it fetches the
//! first page of the run's default dataset. Polling is bounded by a maximum
//! poll count and an overall deadline.
//!
//! Any status other than READY or RUNNING ends tracking, including a payload
//! with no readable status at all, so malformed responses cannot keep the loop
//! alive.

mod handle;

pub use handle::{RunHandle, RunPhase, RunRequest};

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info, instrument};

use crate::config::PollingConfig;
use crate::remote::{ApiOutcome, RemoteApi, RunSnapshot, RunStatus};

/// Bounds for the polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_polls: u32,
    pub deadline: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_polls: 200,
            deadline: Duration::from_secs(15 * 60),
        }
    }
}

impl From<&PollingConfig> for PollPolicy {
    fn from(cfg: &PollingConfig) -> Self {
        Self {
            interval: cfg.interval(),
            max_polls: cfg.max_polls,
            deadline: cfg.deadline(),
        }
    }
}

/// How tracking of a run ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RunOutcome {
    /// Succeeded and the default dataset was fetched.
    Dataset { run: ApiOutcome, dataset: ApiOutcome },
    /// Succeeded without a default dataset id.
    Succeeded { run: ApiOutcome },
    /// Any other terminal status, with the status response verbatim.
    Terminal {
        status: RunStatus,
        payload: ApiOutcome,
    },
    /// The status call got no response.
    Unreachable { error: String },
    /// Poll budget or deadline exhausted. The remote run keeps going.
    GaveUp {
        polls: u32,
        #[serde(rename = "lastStatus")]
        last_status: Option<RunStatus>,
    },
}

impl RunOutcome {
    /// The run succeeded and, when it had a dataset, the items were fetched.
    pub fn is_success(&self) -> bool {
        match self {
            Self::Dataset { dataset, .. } => !dataset.is_transport_error(),
            Self::Succeeded { .. } => true,
            _ => false,
        }
    }
}

/// Result of a single poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum PollStep {
    /// Still READY or RUNNING; poll again after `retry_after_ms`, passing
    /// `attempt` back so the poll budget holds across requests.
    Pending {
        status: RunStatus,
        attempt: u32,
        #[serde(rename = "retryAfterMs")]
        retry_after_ms: u64,
    },
    Finished { outcome: RunOutcome },
}

/// Progress a stateless caller reports with each poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollProgress {
    /// Polls already made for this run.
    #[serde(default)]
    pub attempt: u32,
    /// Time since the run was submitted.
    #[serde(default)]
    pub elapsed_ms: u64,
}

// Status classified, dataset not yet fetched.
enum Observation {
    Step(PollStep),
    Succeeded { run: ApiOutcome, dataset_id: String },
}

#[derive(Debug, Clone)]
pub struct RunTracker {
    remote: Arc<dyn RemoteApi>,
    policy: PollPolicy,
}

impl RunTracker {
    pub fn new(remote: Arc<dyn RemoteApi>, policy: PollPolicy) -> Self {
        Self { remote, policy }
    }

    /// Start a run. A response without a run id comes back as `Err` so the
    /// caller can show it as is.
    #[instrument(skip(self, request), fields(actor_id = %request.actor_id))]
    pub async fn submit(&self, request: &RunRequest) -> Result<RunHandle, ApiOutcome> {
        let outcome = self
            .remote
            .start_run(&request.actor_id, &request.input_body())
            .await;

        match outcome.data().map(RunSnapshot::from_body).and_then(|s| s.id) {
            Some(run_id) => {
                info!(run_id = %run_id, "Run submitted");
                Ok(RunHandle::new(run_id))
            }
            None => Err(outcome),
        }
    }

    /// Query the status once and classify it. On SUCCEEDED with a dataset id
    /// this performs exactly one dataset fetch.
    pub async fn poll_once(&self, handle: &mut RunHandle) -> PollStep {
        match self.observe(handle).await {
            Observation::Step(step) => step,
            Observation::Succeeded { run, dataset_id } => PollStep::Finished {
                outcome: self.fetch_dataset(run, &dataset_id).await,
            },
        }
    }

    /// One poll for a run known only by id. The caller's progress is checked
    /// against the poll policy, so a remote loop stops where [`Self::track`]
    /// would.
    #[instrument(skip(self))]
    pub async fn poll_run(&self, run_id: &str, progress: PollProgress) -> PollStep {
        let mut handle = RunHandle::new(run_id);
        handle.polls = progress.attempt;
        if progress.attempt >= self.policy.max_polls
            || Duration::from_millis(progress.elapsed_ms) >= self.policy.deadline
        {
            return PollStep::Finished {
                outcome: self.give_up(&handle),
            };
        }

        match self.poll_once(&mut handle).await {
            PollStep::Pending { .. } if handle.polls >= self.policy.max_polls => {
                PollStep::Finished {
                    outcome: self.give_up(&handle),
                }
            }
            step => step,
        }
    }

    /// Poll until the run finishes or the policy runs out.
    #[instrument(skip(self, handle), fields(run_id = %handle.run_id))]
    pub async fn track(&self, handle: &mut RunHandle) -> RunOutcome {
        let started = Instant::now();
        loop {
            let remaining = self.policy.deadline.saturating_sub(started.elapsed());
            if handle.polls >= self.policy.max_polls || remaining.is_zero() {
                return self.give_up(handle);
            }

            // The deadline bounds status polling only. Once SUCCEEDED is seen,
            // the dataset fetch runs to completion under the client timeout.
            let step = match tokio::time::timeout(remaining, self.observe(handle)).await {
                Ok(Observation::Step(step)) => step,
                Ok(Observation::Succeeded { run, dataset_id }) => PollStep::Finished {
                    outcome: self.fetch_dataset(run, &dataset_id).await,
                },
                Err(_) => return self.give_up(handle),
            };
            if let PollStep::Finished { outcome } = step {
                info!(polls = handle.polls, success = outcome.is_success(), "Run finished");
                return outcome;
            }

            if handle.polls >= self.policy.max_polls {
                return self.give_up(handle);
            }
            let remaining = self.policy.deadline.saturating_sub(started.elapsed());
            tokio::time::sleep(self.policy.interval.min(remaining)).await;
        }
    }

    #[instrument(skip(self, handle), fields(run_id = %handle.run_id, poll = handle.polls + 1))]
    async fn observe(&self, handle: &mut RunHandle) -> Observation {
        handle.polls += 1;
        let outcome = self.remote.get_run_status(&handle.run_id).await;

        let snapshot = match &outcome {
            ApiOutcome::Response { data, .. } => RunSnapshot::from_body(data),
            ApiOutcome::TransportError { error } => {
                return Observation::Step(PollStep::Finished {
                    outcome: RunOutcome::Unreachable {
                        error: error.clone(),
                    },
                });
            }
        };
        handle.observe(&snapshot);
        debug!(status = %snapshot.status, "Run status observed");

        let outcome = match snapshot.status {
            status if status.is_pending() => {
                return Observation::Step(PollStep::Pending {
                    status,
                    attempt: handle.polls,
                    retry_after_ms: u64::try_from(self.policy.interval.as_millis())
                        .unwrap_or(u64::MAX),
                });
            }
            RunStatus::Succeeded => match snapshot.default_dataset_id {
                Some(dataset_id) => {
                    return Observation::Succeeded {
                        run: outcome,
                        dataset_id,
                    };
                }
                None => RunOutcome::Succeeded { run: outcome },
            },
            status => RunOutcome::Terminal {
                status,
                payload: outcome,
            },
        };
        Observation::Step(PollStep::Finished { outcome })
    }

    async fn fetch_dataset(&self, run: ApiOutcome, dataset_id: &str) -> RunOutcome {
        let dataset = self.remote.get_dataset_items(dataset_id).await;
        RunOutcome::Dataset { run, dataset }
    }

    /// Submit and track to the end.
    pub async fn run(&self, request: &RunRequest) -> Result<RunOutcome, ApiOutcome> {
        let mut handle = self.submit(request).await?;
        Ok(self.track(&mut handle).await)
    }

    fn give_up(&self, handle: &RunHandle) -> RunOutcome {
        tracing::warn!(
            polls = handle.polls,
            max_polls = self.policy.max_polls,
            deadline_secs = self.policy.deadline.as_secs(),
            "Stopped tracking run before it finished"
        );
        RunOutcome::GaveUp {
            polls: handle.polls,
            last_status: handle.status().cloned(),
        }
    }
}
