use serde_json::{Value, json};

use crate::api::ApiError;
use crate::config::ResolvedConfig;

pub fn emit_json_value(value: &Value, pretty: bool) -> anyhow::Result<String> {
    if pretty {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(serde_json::to_string(value)?)
    }
}

/// Renders a service response as received. Only trailing whitespace is
/// dropped; an empty body prints as `{}`.
pub fn emit_response(body: &str) -> String {
    let body = body.trim_end();
    if body.trim_start().is_empty() {
        return "{}".to_string();
    }
    body.to_string()
}

pub fn error_json(message: &str, kind: &str) -> Value {
    json!({
        "error": {
            "message": message,
            "kind": kind,
        }
    })
}

pub fn api_error_json(err: &ApiError) -> Value {
    json!({
        "error": {
            "status": err.status,
            "detail": err.detail,
        }
    })
}

pub fn config_to_json(resolved: &ResolvedConfig, token_source: Option<&str>) -> Value {
    json!({
        "configPath": resolved.config_path.as_ref().map(|p| p.display().to_string()),
        "profileName": resolved.profile_name,
        "service": {
            "endpoint": resolved.service.endpoint,
            "accessToken": resolved.service.access_token.as_deref().map(mask_secret),
            "tokenSource": token_source,
            "quotaProject": resolved.service.quota_project,
            "timeoutMs": resolved.service.timeout_ms,
        },
        "settings": {
            "output": {
                "defaultFormat": resolved.settings.output.default_format.as_str(),
                "json": {
                    "pretty": resolved.settings.output.json_pretty,
                },
            }
        }
    })
}

pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 8 {
        return "****".to_string();
    }
    format!("{}****", visible)
}
