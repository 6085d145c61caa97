//! Deviations
//!
//! Full CRUD over `/deviations` plus filtered listing and aggregate stats.

use super::{Collection, Filters};
use crate::api::{ApiClient, ClientError, EndpointDescriptor, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;

pub const LIST: EndpointDescriptor = EndpointDescriptor::query("/deviations");
pub const GET: EndpointDescriptor = EndpointDescriptor::read("/deviations/{id}");
pub const CREATE: EndpointDescriptor = EndpointDescriptor::write("/deviations", Method::Post);
pub const UPDATE: EndpointDescriptor = EndpointDescriptor::write("/deviations/{id}", Method::Put);
pub const DELETE: EndpointDescriptor = EndpointDescriptor::remove("/deviations/{id}");
pub const STATS: EndpointDescriptor = EndpointDescriptor::read("/deviations/stats");

pub const ENDPOINTS: &[EndpointDescriptor] = &[LIST, GET, CREATE, UPDATE, DELETE, STATS];

/// Deviation operations, decoding records as `T`
#[derive(Debug, Clone, Copy)]
pub struct Deviations<'c, T = Value> {
    api: Collection<'c>,
    _record: PhantomData<fn() -> T>,
}

impl<'c, T: DeserializeOwned> Deviations<'c, T> {
    pub fn new(client: &'c ApiClient) -> Self {
        Self {
            api: Collection::new(client),
            _record: PhantomData,
        }
    }

    /// List deviations. Empty `filters` sends no query string.
    pub async fn get_all(&self, filters: &Filters) -> Result<Vec<T>, ClientError> {
        self.api.read_query(&LIST, filters).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<T, ClientError> {
        self.api.read(&GET, Some(id)).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, record: &B) -> Result<Value, ClientError> {
        self.api.write(&CREATE, None, record).await
    }

    /// Replace the whole record
    pub async fn update<B: Serialize + ?Sized>(&self, id: &str, record: &B) -> Result<Value, ClientError> {
        self.api.write(&UPDATE, Some(id), record).await
    }

    pub async fn delete(&self, id: &str) -> Result<Value, ClientError> {
        self.api.remove(&DELETE, id).await
    }

    /// Totals by status, category and risk level
    pub async fn get_stats<S: DeserializeOwned>(&self) -> Result<S, ClientError> {
        self.api.read(&STATS, None).await
    }
}
