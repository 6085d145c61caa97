//! Environmental and process monitoring readings

use super::{filters, Collection, Filters};
use crate::api::{ApiClient, ClientError, EndpointDescriptor, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;

pub const ENVIRONMENTAL: EndpointDescriptor = EndpointDescriptor::query("/monitoring/environmental");
pub const PROCESS: EndpointDescriptor = EndpointDescriptor::read("/monitoring/process");
pub const RECORD: EndpointDescriptor = EndpointDescriptor::write("/monitoring/record", Method::Post);

pub const ENDPOINTS: &[EndpointDescriptor] = &[ENVIRONMENTAL, PROCESS, RECORD];

#[derive(Debug, Clone, Copy)]
pub struct Monitoring<'c, T = Value> {
    api: Collection<'c>,
    _record: PhantomData<fn() -> T>,
}

impl<'c, T: DeserializeOwned> Monitoring<'c, T> {
    pub fn new(client: &'c ApiClient) -> Self {
        Self {
            api: Collection::new(client),
            _record: PhantomData,
        }
    }

    /// Environmental readings, optionally for one location.
    /// An empty location is treated as no location.
    pub async fn get_environmental(&self, location: Option<&str>) -> Result<Vec<T>, ClientError> {
        let query: Filters = match location {
            Some(location) if !location.is_empty() => filters([("location", location)]),
            _ => Filters::new(),
        };
        self.api.read_query(&ENVIRONMENTAL, &query).await
    }

    pub async fn get_process(&self) -> Result<Vec<T>, ClientError> {
        self.api.read(&PROCESS, None).await
    }

    /// Record a new measurement; the backend derives its in/out-of-spec status
    pub async fn record<B: Serialize + ?Sized>(&self, reading: &B) -> Result<Value, ClientError> {
        self.api.write(&RECORD, None, reading).await
    }
}
