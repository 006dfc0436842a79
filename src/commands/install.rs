// src/commands/install.rs

//! Install command - build a formula from an extracted source tree

use anyhow::{Context, Result};
use std::path::Path;
use tapster::build::{BuildConfig, BuildStep};
use tapster::formula::load_formula;
use tracing::info;

/// Options for `tapster install`
pub struct InstallOptions {
    pub jobs: Option<u32>,
    pub make: Option<String>,
    pub no_receipt: bool,
    pub show_log: bool,
}

/// Build and install a formula into a prefix
pub fn cmd_install(spec: &str, source: &str, prefix: &str, opts: InstallOptions) -> Result<()> {
    let formula = load_formula(spec).with_context(|| format!("Failed to load formula: {}", spec))?;
    let source = Path::new(source);
    let prefix = Path::new(prefix);

    let mut config = BuildConfig::from_env();
    if let Some(jobs) = opts.jobs {
        config = config.with_jobs(jobs);
    }
    if let Some(make) = opts.make {
        config.make_program = make;
    }
    config.write_receipt = !opts.no_receipt;

    println!(
        "Building {} with {} parallel jobs...",
        formula.name(),
        config.jobs
    );
    if let Some(reason) = &formula.platform.keg_only {
        println!("  - keg-only: {}", reason.explanation());
    }

    let mut step = BuildStep::new(&formula, &config);
    let result = step.run(source, prefix);

    if opts.show_log && !step.log().is_empty() {
        println!("\n{}", step.log().trim_end());
    }

    let outcome = result.with_context(|| format!("Failed to build {}", formula.name()))?;

    println!(
        "\n[COMPLETE] Installed {} {} to {} ({} files)",
        outcome.formula,
        outcome.version,
        outcome.prefix.display(),
        outcome.manifest.file_count()
    );
    if let Some(receipt) = &outcome.receipt {
        println!("  - receipt: {}", receipt.display());
    }

    info!(
        "Successfully installed {} to {}",
        outcome.formula,
        outcome.prefix.display()
    );

    Ok(())
}
