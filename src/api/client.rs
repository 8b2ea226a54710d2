use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::debug;

use super::MetastoreApi;
use super::auth::resolve_access_token;
use super::error::{ApiError, error_detail};
use crate::config::ServiceSettings;
use crate::error::{AppError, ErrorKind};
use crate::resource::ResourceLevel;

pub const DEFAULT_ENDPOINT: &str = "https://biglake.googleapis.com/v1";

const QUOTA_PROJECT_HEADER: &str = "x-goog-user-project";

/// Blocking HTTP client for the BigLake Metastore REST API.
///
/// One client is built per invocation and dropped when the command returns,
/// which releases its connection pool.
pub struct HttpMetastoreClient {
    client: Client,
    endpoint: String,
    token: String,
    quota_project: Option<String>,
}

impl HttpMetastoreClient {
    pub fn connect(service: &ServiceSettings) -> Result<Self> {
        let (token, source) = resolve_access_token(service)?;
        debug!(token_source = source.as_str(), "resolved access token");
        Self::with_token(service, token)
    }

    pub fn with_token(service: &ServiceSettings, token: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(service.timeout_ms))
            .user_agent(format!("blmcli/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: service.endpoint.trim_end_matches('/').to_string(),
            token,
            quota_project: service.quota_project.clone(),
        })
    }

    fn collection_url(&self, level: ResourceLevel, parent: &str) -> String {
        format!("{}/{}/{}", self.endpoint, parent, level.collection())
    }

    fn send(&self, request: RequestBuilder, url: &str) -> Result<Result<String, ApiError>> {
        let mut request = request
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json");
        if let Some(project) = &self.quota_project {
            request = request.header(QUOTA_PROJECT_HEADER, project);
        }

        let response = request.send().map_err(|err| {
            anyhow::Error::new(AppError::new(
                ErrorKind::Connection,
                format!("Request to {} failed: {}", url, err),
            ))
        })?;
        let status = response.status();
        debug!(status = status.as_u16(), url, "metastore response");

        let body = response
            .text()
            .with_context(|| format!("Failed reading response body: {}", url))?;

        if !status.is_success() {
            return Ok(Err(ApiError::new(
                status.as_u16(),
                error_detail(&body, status.canonical_reason()),
            )));
        }

        Ok(Ok(body))
    }
}

impl MetastoreApi for HttpMetastoreClient {
    fn list(&self, level: ResourceLevel, parent: &str) -> Result<Result<String, ApiError>> {
        let url = self.collection_url(level, parent);
        debug!(method = "GET", url = %url, "metastore request");
        self.send(self.client.get(&url), &url)
    }

    fn create(
        &self,
        level: ResourceLevel,
        parent: &str,
        id: &str,
        body: &Value,
    ) -> Result<Result<String, ApiError>> {
        let id_param = level.id_param().ok_or_else(|| {
            AppError::new(
                ErrorKind::Internal,
                format!("{} cannot be created", level.collection()),
            )
        })?;
        let url = self.collection_url(level, parent);
        debug!(method = "POST", url = %url, id, "metastore request");
        let request = self.client.post(&url).query(&[(id_param, id)]).json(body);
        self.send(request, &url)
    }
}
