//! Resource modules
//!
//! One module per backend entity family. Each is a fixed set of thin
//! operations: build the path, serialize the body if there is one, and hand
//! off to [`ApiClient::request`]. Errors come back unchanged.
//!
//! # Modules
//!
//! - [`users`] - `/users`
//! - [`deviations`] - `/deviations`, with filters and stats
//! - [`capa`] - `/capa`, including lookup by deviation
//! - [`monitoring`] - `/monitoring/*` readings
//! - [`dashboard`] - `/dashboard/*` aggregates
//! - [`reports`] - `/reports`
//! - [`batches`] - `/batches`
//!
//! Record-bearing modules take a type parameter that defaults to
//! `serde_json::Value`; pass a type from [`crate::models`] (or your own) to
//! decode at the boundary instead.
//!
//! # Example
//!
//! ```ignore
//! use qms_client::models::Deviation;
//! use qms_client::resource::{filters, Deviations};
//!
//! async fn open_deviations(client: &qms_client::ApiClient) -> anyhow::Result<Vec<Deviation>> {
//!     let open = Deviations::<Deviation>::new(client)
//!         .get_all(&filters([("status", "Open")]))
//!         .await?;
//!     Ok(open)
//! }
//! ```

pub mod batches;
pub mod capa;
pub mod dashboard;
pub mod deviations;
pub mod monitoring;
pub mod reports;
pub mod users;

pub use batches::Batches;
pub use capa::Capa;
pub use dashboard::Dashboard;
pub use deviations::Deviations;
pub use monitoring::Monitoring;
pub use reports::Reports;
pub use users::Users;

use crate::api::request::with_query;
use crate::api::{ApiClient, ClientError, EndpointDescriptor};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Query-string filters; every value is sent as a string
pub type Filters = BTreeMap<String, String>;

/// Build [`Filters`] from key/value pairs
pub fn filters<I, K, V>(pairs: I) -> Filters
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Every endpoint descriptor, grouped by resource name
pub fn all_endpoints() -> Vec<(&'static str, &'static [EndpointDescriptor])> {
    vec![
        ("users", users::ENDPOINTS),
        ("deviations", deviations::ENDPOINTS),
        ("capa", capa::ENDPOINTS),
        ("monitoring", monitoring::ENDPOINTS),
        ("dashboard", dashboard::ENDPOINTS),
        ("reports", reports::ENDPOINTS),
        ("batches", batches::ENDPOINTS),
    ]
}

/// Executes endpoint descriptors against one client
#[derive(Debug, Clone, Copy)]
pub struct Collection<'c> {
    client: &'c ApiClient,
}

impl<'c> Collection<'c> {
    pub fn new(client: &'c ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &'c ApiClient {
        self.client
    }

    /// GET a descriptor, optionally filling its `{id}`
    pub async fn read<R: DeserializeOwned>(
        &self,
        endpoint: &EndpointDescriptor,
        id: Option<&str>,
    ) -> Result<R, ClientError> {
        let path = endpoint.render(id);
        self.client.request(&path, endpoint.options(None)).await
    }

    /// GET a descriptor with a query string built from `filters`
    pub async fn read_query<R: DeserializeOwned>(
        &self,
        endpoint: &EndpointDescriptor,
        filters: &Filters,
    ) -> Result<R, ClientError> {
        debug_assert!(endpoint.has_query, "{} takes no query", endpoint.path);
        let path = with_query(&endpoint.render(None), filters);
        self.client.request(&path, endpoint.options(None)).await
    }

    /// Serialize `body` and send it with the descriptor's verb
    pub async fn write<B: Serialize + ?Sized>(
        &self,
        endpoint: &EndpointDescriptor,
        id: Option<&str>,
        body: &B,
    ) -> Result<Value, ClientError> {
        debug_assert!(endpoint.has_body, "{} takes no body", endpoint.path);
        let path = endpoint.render(id);
        self.client.send_json(endpoint.method, &path, body).await
    }

    pub async fn remove(&self, endpoint: &EndpointDescriptor, id: &str) -> Result<Value, ClientError> {
        let path = endpoint.render(Some(id));
        self.client.request(&path, endpoint.options(None)).await
    }
}

impl ApiClient {
    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    pub fn deviations(&self) -> Deviations<'_> {
        Deviations::new(self)
    }

    pub fn capa(&self) -> Capa<'_> {
        Capa::new(self)
    }

    pub fn monitoring(&self) -> Monitoring<'_> {
        Monitoring::new(self)
    }

    pub fn dashboard(&self) -> Dashboard<'_> {
        Dashboard::new(self)
    }

    pub fn reports(&self) -> Reports<'_> {
        Reports::new(self)
    }

    pub fn batches(&self) -> Batches<'_> {
        Batches::new(self)
    }
}
