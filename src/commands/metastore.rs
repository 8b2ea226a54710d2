use std::io::{self, Write};

use anyhow::Result;
use serde_json::json;
use tracing::{info, warn};

use crate::api::{ApiError, HttpMetastoreClient, MetastoreApi};
use crate::cli::CliArgs;
use crate::commands::common;
use crate::config::OutputFormat;
use crate::output::json as json_out;
use crate::resource::{MetastoreCommand, Operation};

/// Result of one metastore call. A failure status from the service is an
/// outcome to report, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Body as the service sent it.
    Success(String),
    Failure(ApiError),
}

pub fn run(args: &CliArgs, cmd: &MetastoreCommand) -> Result<()> {
    let resolved = common::load_config(args)?;
    let format = common::output_format(args, &resolved);

    let outcome = {
        let client = HttpMetastoreClient::connect(&resolved.service)?;
        execute(&client, cmd)?
    };

    let rendered = render(&outcome, format, common::json_pretty(&resolved))?;
    writeln!(io::stdout(), "{}", rendered)?;
    Ok(())
}

/// Builds the parent path, issues exactly one call and classifies the reply.
pub fn execute<A: MetastoreApi + ?Sized>(api: &A, cmd: &MetastoreCommand) -> Result<Outcome> {
    let parent = cmd.parent_path();
    let level = cmd.level();
    info!(
        command = cmd.name(),
        operation = cmd.operation().as_str(),
        parent = %parent,
        "calling metastore"
    );

    let reply = match (cmd.operation(), cmd.resource_id()) {
        (Operation::Create, Some(id)) => {
            let body = cmd.request_body().unwrap_or_else(|| json!({}));
            api.create(level, &parent, id, &body)?
        }
        _ => api.list(level, &parent)?,
    };

    Ok(match reply {
        Ok(body) => Outcome::Success(body),
        Err(err) => {
            warn!(status = err.status, command = cmd.name(), "metastore call failed");
            Outcome::Failure(err)
        }
    })
}

pub fn render(outcome: &Outcome, format: OutputFormat, pretty: bool) -> Result<String> {
    match outcome {
        Outcome::Success(body) => Ok(json_out::emit_response(body)),
        Outcome::Failure(err) if format == OutputFormat::Json => {
            json_out::emit_json_value(&json_out::api_error_json(err), pretty)
        }
        Outcome::Failure(err) => Ok(err.to_string()),
    }
}
