//! Production batches

use super::Collection;
use crate::api::{ApiClient, ClientError, EndpointDescriptor};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;

pub const LIST: EndpointDescriptor = EndpointDescriptor::read("/batches");

pub const ENDPOINTS: &[EndpointDescriptor] = &[LIST];

#[derive(Debug, Clone, Copy)]
pub struct Batches<'c, T = Value> {
    api: Collection<'c>,
    _record: PhantomData<fn() -> T>,
}

impl<'c, T: DeserializeOwned> Batches<'c, T> {
    pub fn new(client: &'c ApiClient) -> Self {
        Self {
            api: Collection::new(client),
            _record: PhantomData,
        }
    }

    pub async fn get_all(&self) -> Result<Vec<T>, ClientError> {
        self.api.read(&LIST, None).await
    }
}
