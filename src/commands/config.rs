use std::io::{self, Write};

use anyhow::Result;

use crate::api::TokenSource;
use crate::cli::CliArgs;
use crate::commands::common;
use crate::config::OutputFormat;
use crate::output::{TableOptions, json, table};

pub fn run(args: &CliArgs) -> Result<()> {
    let resolved = common::load_config(args)?;
    let format = common::output_format(args, &resolved);
    let token_source = TokenSource::detect(&resolved.service).map(TokenSource::as_str);

    if args.quiet {
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            let payload = json::config_to_json(&resolved, token_source);
            let body = json::emit_json_value(&payload, common::json_pretty(&resolved))?;
            writeln!(io::stdout(), "{}", body)?;
        }
        _ => {
            let mut rows = vec![
                (
                    "configPath".to_string(),
                    resolved
                        .config_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "(none)".to_string()),
                ),
                ("profileName".to_string(), resolved.profile_name.clone()),
                ("endpoint".to_string(), resolved.service.endpoint.clone()),
                (
                    "tokenSource".to_string(),
                    token_source.unwrap_or("(none)").to_string(),
                ),
            ];
            if let Some(token) = &resolved.service.access_token {
                rows.push(("accessToken".to_string(), json::mask_secret(token)));
            }
            if let Some(project) = &resolved.service.quota_project {
                rows.push(("quotaProject".to_string(), project.clone()));
            }
            rows.push((
                "timeoutMs".to_string(),
                resolved.service.timeout_ms.to_string(),
            ));

            let rendered =
                table::render_key_value_table("Config", &rows, format, &TableOptions::default());
            writeln!(io::stdout(), "{}", rendered)?;
        }
    }

    Ok(())
}
