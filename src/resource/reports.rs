//! Generated reports

use super::Collection;
use crate::api::{ApiClient, ClientError, EndpointDescriptor, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;

pub const LIST: EndpointDescriptor = EndpointDescriptor::read("/reports");
pub const GENERATE: EndpointDescriptor = EndpointDescriptor::write("/reports/generate", Method::Post);

pub const ENDPOINTS: &[EndpointDescriptor] = &[LIST, GENERATE];

#[derive(Debug, Clone, Copy)]
pub struct Reports<'c, T = Value> {
    api: Collection<'c>,
    _record: PhantomData<fn() -> T>,
}

impl<'c, T: DeserializeOwned> Reports<'c, T> {
    pub fn new(client: &'c ApiClient) -> Self {
        Self {
            api: Collection::new(client),
            _record: PhantomData,
        }
    }

    pub async fn get_all(&self) -> Result<Vec<T>, ClientError> {
        self.api.read(&LIST, None).await
    }

    pub async fn generate<B: Serialize + ?Sized>(&self, request: &B) -> Result<Value, ClientError> {
        self.api.write(&GENERATE, None, request).await
    }
}
