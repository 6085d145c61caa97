//! Dashboard aggregates
//!
//! Payload shapes are backend-defined, so each call decodes into whatever
//! the caller asks for (`serde_json::Value`, [`crate::models::DashboardKpis`], ...).

use super::Collection;
use crate::api::{ApiClient, ClientError, EndpointDescriptor};
use serde::de::DeserializeOwned;

pub const KPIS: EndpointDescriptor = EndpointDescriptor::read("/dashboard/kpis");
pub const TRENDS: EndpointDescriptor = EndpointDescriptor::read("/dashboard/trends");
pub const RECENT_ACTIVITY: EndpointDescriptor = EndpointDescriptor::read("/dashboard/recent-activity");

pub const ENDPOINTS: &[EndpointDescriptor] = &[KPIS, TRENDS, RECENT_ACTIVITY];

#[derive(Debug, Clone, Copy)]
pub struct Dashboard<'c> {
    api: Collection<'c>,
}

impl<'c> Dashboard<'c> {
    pub fn new(client: &'c ApiClient) -> Self {
        Self {
            api: Collection::new(client),
        }
    }

    pub async fn get_kpis<R: DeserializeOwned>(&self) -> Result<R, ClientError> {
        self.api.read(&KPIS, None).await
    }

    pub async fn get_trends<R: DeserializeOwned>(&self) -> Result<R, ClientError> {
        self.api.read(&TRENDS, None).await
    }

    pub async fn get_recent_activity<R: DeserializeOwned>(&self) -> Result<R, ClientError> {
        self.api.read(&RECENT_ACTIVITY, None).await
    }
}
