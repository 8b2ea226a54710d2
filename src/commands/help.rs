use std::io::{self, Write};

use anyhow::anyhow;

use crate::cli::build_cli;

pub fn run(show_all: bool, command: Option<&str>) -> anyhow::Result<()> {
    let mut cmd = build_cli(show_all);

    match command {
        Some(name) => {
            let sub = cmd
                .find_subcommand_mut(name)
                .ok_or_else(|| anyhow!("Unknown command: {}", name))?;
            sub.print_long_help()?;
        }
        None => cmd.print_long_help()?,
    }

    io::stdout().flush()?;
    Ok(())
}
