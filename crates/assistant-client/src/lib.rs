//! Client for the assistant endpoint that stores per-tour completion state.
//!
//! The coordinator in `guide-core` never talks to the network itself. A
//! composition root calls [`AssistantClient::fetch`] at boot (and again
//! after any write it wants reconciled) and feeds the raw payload to
//! `Coordinator::fetch_succeeded`, which owns the malformed-payload policy.
//! Writes go the other way: the coordinator's `CompletionSink` is satisfied
//! by this client, which PUTs the new status on a background thread and
//! drops any failure — the in-memory ledger is already updated
//! optimistically, so a lost write only risks the tour reappearing after a
//! future full reload.

pub mod error;

pub use error::{ClientError, Result};

use guide_core::coordinator::CompletionSink;
use guide_core::types::CompletionStatus;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
struct CompletionBody {
    guide_id: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    useful: Option<bool>,
}

// ---------------------------------------------------------------------------
// AssistantClient
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AssistantClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

impl AssistantClient {
    /// `base_url` is the API root, e.g. `https://app.example.io/api/0`.
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/assistant/", base_url.trim_end_matches('/')),
        })
    }

    /// `GET /assistant/` — the raw JSON payload, unvalidated. The
    /// coordinator decides what to do with a malformed body; this method
    /// only fails on transport or status errors.
    pub fn fetch(&self) -> Result<Value> {
        let response = self.http.get(&self.endpoint).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }
        Ok(response.json()?)
    }

    /// Synchronous `PUT /assistant/`. Exposed for callers that want the
    /// result; the `CompletionSink` impl wraps this fire-and-forget.
    pub fn put_completion(
        &self,
        tour: &str,
        status: CompletionStatus,
        useful: Option<bool>,
    ) -> Result<()> {
        let body = CompletionBody {
            guide_id: tour.to_string(),
            status: status.as_str(),
            useful,
        };
        let response = self.http.put(&self.endpoint).json(&body).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }
        Ok(())
    }
}

impl CompletionSink for AssistantClient {
    fn record(&self, tour: &str, status: CompletionStatus, useful: Option<bool>) {
        let client = self.clone();
        let tour = tour.to_string();
        std::thread::spawn(move || {
            if let Err(err) = client.put_completion(&tour, status, useful) {
                debug!(%tour, %status, "assistant write dropped: {err}");
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
