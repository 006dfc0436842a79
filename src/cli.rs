// src/cli.rs

//! CLI definitions for tapster
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "tapster")]
#[command(author = "Tapster Contributors")]
#[command(version)]
#[command(about = "Build libraries from source formulas into an installation prefix", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List built-in formulas
    List,

    /// Show a formula and the configure line it resolves to
    Info {
        /// Built-in formula name or path to a formula .toml file
        formula: String,

        /// Prefix to show in the configure line
        #[arg(long, default_value = "/usr/local/opt/<formula>")]
        prefix: String,
    },

    /// Parse and validate a formula file
    Validate {
        /// Path to the formula .toml file
        path: String,
    },

    /// Configure, build and install a formula from an extracted source tree
    Install {
        /// Built-in formula name or path to a formula .toml file
        formula: String,

        /// Extracted source tree (the formula's workdir is relative to it)
        #[arg(short, long)]
        source: String,

        /// Installation prefix
        #[arg(short, long)]
        prefix: String,

        /// Number of parallel make jobs (default: from TAPSTER_JOBS or CPU count)
        #[arg(short, long)]
        jobs: Option<u32>,

        /// Make program (default: from TAPSTER_MAKE or "make")
        #[arg(long)]
        make: Option<String>,

        /// Do not write INSTALL_RECEIPT.json into the prefix
        #[arg(long)]
        no_receipt: bool,

        /// Print the captured build log
        #[arg(long)]
        show_log: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
