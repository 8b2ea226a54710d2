use std::process::Command;

use anyhow::Result;
use tracing::{debug, warn};

use crate::config::ServiceSettings;
use crate::error::{AppError, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Configured,
    Gcloud,
}

impl TokenSource {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenSource::Configured => "configured",
            TokenSource::Gcloud => "gcloud",
        }
    }

    /// Where a token would come from, without running any external tool.
    pub fn detect(service: &ServiceSettings) -> Option<Self> {
        if configured_token(service).is_some() {
            return Some(TokenSource::Configured);
        }
        which::which("gcloud").ok().map(|_| TokenSource::Gcloud)
    }
}

pub fn resolve_access_token(service: &ServiceSettings) -> Result<(String, TokenSource)> {
    if let Some(token) = configured_token(service) {
        return Ok((token.to_string(), TokenSource::Configured));
    }

    if let Some(token) = gcloud_access_token() {
        return Ok((token, TokenSource::Gcloud));
    }

    Err(AppError::new(
        ErrorKind::Auth,
        "No access token: pass --access-token, set BIGLAKE_ACCESS_TOKEN, or log in with gcloud",
    )
    .into())
}

fn configured_token(service: &ServiceSettings) -> Option<&str> {
    service
        .access_token
        .as_deref()
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn gcloud_access_token() -> Option<String> {
    let gcloud = which::which("gcloud").ok()?;
    debug!(path = %gcloud.display(), "requesting access token from gcloud");

    let output = match Command::new(&gcloud)
        .args(["auth", "print-access-token"])
        .output()
    {
        Ok(output) => output,
        Err(err) => {
            warn!("failed to run gcloud: {}", err);
            return None;
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!(
            "gcloud auth print-access-token failed: {}",
            stderr.lines().next().unwrap_or_default()
        );
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() { None } else { Some(token) }
}
