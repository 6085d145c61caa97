//! QMS API interaction module
//!
//! Transport-level pieces shared by every resource module.
//!
//! # Module Structure
//!
//! - [`client`] - [`ApiClient`], the request primitive over reqwest
//! - [`error`] - [`ClientError`], the normalized error
//! - `http` - response normalization helpers
//! - [`probe`] - advisory connectivity check
//! - [`request`] - verbs, per-call options, endpoint descriptors
//!
//! # Example
//!
//! ```ignore
//! use qms_client::{ApiClient, ClientConfig};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = ApiClient::new(ClientConfig::default())?;
//!     let stats: serde_json::Value = client.get("/deviations/stats").await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub(crate) mod http;
pub mod probe;
pub mod request;

pub use client::ApiClient;
pub use error::{ClientError, ErrorKind};
pub use probe::{check_connection, log_probe_outcome, spawn_probe, ProbeOutcome, ProbeStatus};
pub use request::{EndpointDescriptor, Method, RequestOptions};
