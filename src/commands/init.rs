use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde_json::json;

use crate::api::DEFAULT_ENDPOINT;
use crate::cli::{CliArgs, InitArgs};
use crate::config::OutputFormat;
use crate::output::json as json_out;

pub fn run(args: &CliArgs, cmd: &InitArgs) -> Result<()> {
    let profile_name = args.profile.as_deref().unwrap_or("default");
    let target = resolve_target_path(cmd.path.as_ref());

    if target.exists() && !cmd.force {
        return Err(anyhow!("Config already exists: {}", target.display()));
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    fs::write(&target, render_config_template(profile_name))
        .with_context(|| format!("Failed to write {}", target.display()))?;

    if args.quiet {
        return Ok(());
    }

    if args.output.json {
        let payload = json!({
            "path": target.display().to_string(),
            "created": true,
            "overwritten": cmd.force,
        });
        println!("{}", json_out::emit_json_value(&payload, true)?);
    } else {
        println!("Wrote config to {}", target.display());
    }

    Ok(())
}

fn resolve_target_path(path: Option<&PathBuf>) -> PathBuf {
    match path {
        Some(path)
            if path
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| matches!(ext, "yaml" | "yml" | "json")) =>
        {
            path.clone()
        }
        Some(path) => path.join(".biglake").join("config.yaml"),
        None => Path::new(".biglake").join("config.yaml"),
    }
}

fn render_config_template(profile: &str) -> String {
    format!(
        r#"# blmcli configuration

defaultProfile: {profile}
settings:
  output:
    # defaultFormat controls config/error rendering when no explicit flag is used.
    # Values: {pretty} | {markdown} | {json}
    defaultFormat: {pretty}
    json:
      # pretty controls indentation when printing responses.
      pretty: true

profiles:
  {profile}:
    endpoint: {endpoint}
    # Read the OAuth token from this variable; gcloud is used when unset.
    accessTokenEnv: BIGLAKE_ACCESS_TOKEN
    quotaProject: null
    timeout: 30000
"#,
        pretty = OutputFormat::Pretty.as_str(),
        markdown = OutputFormat::Markdown.as_str(),
        json = OutputFormat::Json.as_str(),
        endpoint = DEFAULT_ENDPOINT,
    )
}
