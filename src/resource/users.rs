//! Users

use super::Collection;
use crate::api::{ApiClient, ClientError, EndpointDescriptor};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;

pub const LIST: EndpointDescriptor = EndpointDescriptor::read("/users");
pub const GET: EndpointDescriptor = EndpointDescriptor::read("/users/{id}");

pub const ENDPOINTS: &[EndpointDescriptor] = &[LIST, GET];

#[derive(Debug, Clone, Copy)]
pub struct Users<'c, T = Value> {
    api: Collection<'c>,
    _record: PhantomData<fn() -> T>,
}

impl<'c, T: DeserializeOwned> Users<'c, T> {
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
}
