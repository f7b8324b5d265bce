//! `reqwest` implementation of [`RemoteApi`].

use std::fmt;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde_json::Value;
use tracing::instrument;
use url::Url;

use super::{ApiOutcome, DATASET_PAGE_LIMIT, RemoteApi};
use crate::config::RemoteConfig;
use crate::error::{ConsoleError, Result};

/// Client for the remote actor execution API.
///
/// The credential travels as a `token` query parameter. When no credential is
/// configured the parameter is sent empty and the remote rejects the call.
#[derive(Clone)]
pub struct ApifyClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl fmt::Debug for ApifyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApifyClient")
            .field("base_url", &self.base_url.as_str())
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

impl ApifyClient {
    pub fn new(settings: &RemoteConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Self::with_client(settings, http)
    }

    /// Create a client around an existing `reqwest` client.
    pub fn with_client(settings: &RemoteConfig, http: reqwest::Client) -> Result<Self> {
        let base_url = Url::parse(&settings.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ConsoleError::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        Ok(Self {
            http,
            base_url,
            token: settings
                .api_token
                .clone()
                .filter(|t| !t.trim().is_empty()),
        })
    }

    /// Build `{base}/{segments..}?token=…`. Each segment is inserted verbatim
    /// apart from percent-encoding of characters that would split it.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.query_pairs_mut()
            .append_pair("token", self.token.as_deref().unwrap_or_default());
        url
    }

    async fn send(&self, request: RequestBuilder) -> ApiOutcome {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return transport_failure(e),
        };
        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => {
                tracing::debug!(status, bytes = body.len(), "remote response");
                ApiOutcome::from_body(status, &body)
            }
            Err(e) => transport_failure(e),
        }
    }
}

// The URL carries the credential, so it never reaches the message. The whole
// source chain is kept: reqwest's own Display is the same for every cause.
fn transport_failure(err: reqwest::Error) -> ApiOutcome {
    let message = format!("{:#}", anyhow::Error::from(err.without_url()));
    tracing::warn!(error = %message, "remote request failed");
    ApiOutcome::transport(message)
}

#[async_trait]
impl RemoteApi for ApifyClient {
    #[instrument(skip(self, input))]
    async fn start_run(&self, actor_id: &str, input: &Value) -> ApiOutcome {
        let url = self.endpoint(&["v2", "acts", actor_id, "runs"]);
        self.send(self.http.post(url).json(input)).await
    }

    #[instrument(skip(self))]
    async fn get_run_status(&self, run_id: &str) -> ApiOutcome {
        let url = self.endpoint(&["v2", "actor-runs", run_id]);
        self.send(self.http.get(url)).await
    }

    #[instrument(skip(self))]
    async fn get_dataset_items(&self, dataset_id: &str) -> ApiOutcome {
        let mut url = self.endpoint(&["v2", "datasets", dataset_id, "items"]);
        url.query_pairs_mut()
            .append_pair("limit", &DATASET_PAGE_LIMIT.to_string());
        self.send(self.http.get(url)).await
    }
}
