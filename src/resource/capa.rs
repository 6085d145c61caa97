//! CAPA (corrective and preventive action) records

use super::Collection;
use crate::api::{ApiClient, ClientError, EndpointDescriptor, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;

pub const LIST: EndpointDescriptor = EndpointDescriptor::read("/capa");
pub const GET: EndpointDescriptor = EndpointDescriptor::read("/capa/{id}");
pub const CREATE: EndpointDescriptor = EndpointDescriptor::write("/capa", Method::Post);
pub const UPDATE: EndpointDescriptor = EndpointDescriptor::write("/capa/{id}", Method::Put);
pub const BY_DEVIATION: EndpointDescriptor = EndpointDescriptor::read("/capa/by-deviation/{id}");
pub const STATS: EndpointDescriptor = EndpointDescriptor::read("/capa/stats");

pub const ENDPOINTS: &[EndpointDescriptor] = &[LIST, GET, CREATE, UPDATE, BY_DEVIATION, STATS];

#[derive(Debug, Clone, Copy)]
pub struct Capa<'c, T = Value> {
    api: Collection<'c>,
    _record: PhantomData<fn() -> T>,
}

impl<'c, T: DeserializeOwned> Capa<'c, T> {
    pub fn new(client: &'c ApiClient) -> Self {
        Self {
            api: Collection::new(client),
            _record: PhantomData,
        }
    }

    pub async fn get_all(&self) -> Result<Vec<T>, ClientError> {
        self.api.read(&LIST, None).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<T, ClientError> {
        self.api.read(&GET, Some(id)).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, record: &B) -> Result<Value, ClientError> {
        self.api.write(&CREATE, None, record).await
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: &str, record: &B) -> Result<Value, ClientError> {
        self.api.write(&UPDATE, Some(id), record).await
    }

    /// CAPA records raised against one deviation
    pub async fn get_by_deviation(&self, deviation_id: &str) -> Result<Vec<T>, ClientError> {
        self.api.read(&BY_DEVIATION, Some(deviation_id)).await
    }

    pub async fn get_stats<S: DeserializeOwned>(&self) -> Result<S, ClientError> {
        self.api.read(&STATS, None).await
    }
}
