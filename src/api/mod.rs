mod auth;
mod client;
mod error;

pub use auth::{TokenSource, resolve_access_token};
pub use client::{DEFAULT_ENDPOINT, HttpMetastoreClient};
pub use error::{ApiError, error_detail};

use serde_json::Value;

use crate::resource::ResourceLevel;

/// Remote operations exposed by the metastore service.
///
/// `Ok(body)` carries the success body exactly as the service sent it.
/// `Err(ApiError)` is a response the service returned with a failure status.
/// Transport problems are reported through the outer `anyhow::Result`.
pub trait MetastoreApi {
    fn list(&self, level: ResourceLevel, parent: &str)
    -> anyhow::Result<Result<String, ApiError>>;

    fn create(
        &self,
        level: ResourceLevel,
        parent: &str,
        id: &str,
        body: &Value,
    ) -> anyhow::Result<Result<String, ApiError>>;
}
