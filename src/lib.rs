//! Typed async client for the pharmaceutical QMS REST API
//!
//! [`ApiClient`] wraps one reqwest transport behind a single request
//! primitive; the [`resource`] modules (users, deviations, CAPA, monitoring,
//! dashboard, reports, batches) are thin compositions over it. Every failure
//! is normalized into [`ClientError`].
//!
//! # Example
//!
//! ```ignore
//! use qms_client::{ApiClient, ClientConfig};
//! use serde_json::json;
//!
//! async fn raise_deviation() -> anyhow::Result<()> {
//!     let client = ApiClient::new(ClientConfig::default().with_env_overrides())?;
//!     qms_client::api::spawn_probe(client.clone(), qms_client::api::log_probe_outcome);
//!
//!     let ack = client
//!         .deviations()
//!         .create(&json!({"title": "Temp excursion", "severity": 6}))
//!         .await?;
//!     println!("{}", ack);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod models;
pub mod resource;

pub use api::{ApiClient, ClientError, ErrorKind, Method, RequestOptions};
pub use config::ClientConfig;
pub use resource::{filters, Filters};
