// src/main.rs

use anyhow::Result;
use clap::{CommandFactory, Parser};

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::InstallOptions;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List) => commands::cmd_list(),
        Some(Commands::Info { formula, prefix }) => commands::cmd_info(&formula, &prefix),
        Some(Commands::Validate { path }) => commands::cmd_validate(&path),
        Some(Commands::Install {
            formula,
            source,
            prefix,
            jobs,
            make,
            no_receipt,
            show_log,
        }) => commands::cmd_install(
            &formula,
            &source,
            &prefix,
            InstallOptions {
                jobs,
                make,
                no_receipt,
                show_log,
            },
        ),
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "tapster", &mut std::io::stdout());
            Ok(())
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}
