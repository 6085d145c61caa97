//! Normalized client error
//!
//! Every failure produced by the request primitive, whether the transport
//! broke or the backend answered with a non-success status, is reported as a
//! single [`ClientError`]. Its `Display` output is the human-readable message
//! and nothing else, so callers can surface it directly.

use std::fmt;
use thiserror::Error;

/// Generic message used when the backend does not supply one
pub(crate) fn status_message(status: u16) -> String {
    format!("HTTP error! status: {}", status)
}

/// Broad category of a [`ClientError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The round-trip never completed (DNS, connection refused, reset)
    Network,
    /// A configured timeout elapsed before the response arrived
    Timeout,
    /// The backend answered with a status outside the 2xx range
    Application,
    /// A success response whose body was not the expected JSON
    Decode,
    /// The request body could not be serialized
    Encode,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Application => "application",
            Self::Decode => "decode",
            Self::Encode => "encode",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The one error shape returned by every API call
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ClientError {
    kind: ErrorKind,
    status: Option<u16>,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl ClientError {
    /// Backend rejected the request. `message` is used verbatim when present.
    pub fn application(status: u16, message: Option<String>) -> Self {
        Self {
            kind: ErrorKind::Application,
            status: Some(status),
            message: message.unwrap_or_else(|| status_message(status)),
            source: None,
        }
    }

    /// A 2xx response whose body did not decode
    pub fn decode(status: u16, source: serde_json::Error) -> Self {
        Self {
            kind: ErrorKind::Decode,
            status: Some(status),
            message: format!("Invalid JSON in response (status: {})", status),
            source: Some(Box::new(source)),
        }
    }

    pub fn encode(source: serde_json::Error) -> Self {
        Self {
            kind: ErrorKind::Encode,
            status: None,
            message: format!("Failed to serialize request body: {}", source),
            source: Some(Box::new(source)),
        }
    }

    /// Map a reqwest failure onto the network or timeout kind
    pub fn transport(source: reqwest::Error) -> Self {
        let (kind, message) = if source.is_timeout() {
            (ErrorKind::Timeout, "Request timed out".to_string())
        } else if source.is_builder() {
            (ErrorKind::Network, format!("Invalid request: {}", source))
        } else {
            (
                ErrorKind::Network,
                "Network error: could not reach the API server".to_string(),
            )
        };

        Self {
            kind,
            status: source.status().map(|s| s.as_u16()),
            message,
            source: Some(Box::new(source)),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status, when a response was received
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// True for failures where no usable response came back
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, ErrorKind::Network | ErrorKind::Timeout)
    }
}
