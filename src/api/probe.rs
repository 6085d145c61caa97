//! Connectivity probe
//!
//! One advisory GET against the transport root. The outcome is handed to a
//! caller-supplied callback; nothing else in the client depends on it.

use super::client::ApiClient;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::task::JoinHandle;

/// Result of a connectivity check
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    pub url: String,
    pub checked_at: DateTime<Utc>,
    pub status: ProbeStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProbeStatus {
    /// Root answered 2xx; `version` comes from its body when that is JSON
    Connected { version: Option<String> },
    Unreachable { reason: String },
}

impl ProbeOutcome {
    pub fn is_connected(&self) -> bool {
        matches!(self.status, ProbeStatus::Connected { .. })
    }
}

/// Check whether the backend root answers
pub async fn check_connection(client: &ApiClient) -> ProbeOutcome {
    let url = client.root_url().to_string();

    let status = match client.get_absolute_text(&url).await {
        Ok(body) => ProbeStatus::Connected {
            version: root_version(&body),
        },
        Err(e) => ProbeStatus::Unreachable {
            reason: e.to_string(),
        },
    };

    ProbeOutcome {
        url,
        checked_at: Utc::now(),
        status,
    }
}

/// `version` from a JSON root body; any other body carries none
fn root_version(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("version")?
        .as_str()
        .map(|s| s.to_string())
}

/// Run the probe in the background and pass its outcome to `on_outcome`
pub fn spawn_probe<F>(client: ApiClient, on_outcome: F) -> JoinHandle<()>
where
    F: FnOnce(&ProbeOutcome) + Send + 'static,
{
    tokio::spawn(async move {
        let outcome = check_connection(&client).await;
        on_outcome(&outcome);
    })
}

/// Default callback: report the outcome through `tracing`
pub fn log_probe_outcome(outcome: &ProbeOutcome) {
    match &outcome.status {
        ProbeStatus::Connected { version } => {
            tracing::info!(
                "API server connected at {} (version {})",
                outcome.url,
                version.as_deref().unwrap_or("unknown")
            );
        }
        ProbeStatus::Unreachable { reason } => {
            tracing::warn!("API server not running at {}: {}", outcome.url, reason);
            tracing::warn!("Please start the backend server (python backend/api.py)");
        }
    }
}
