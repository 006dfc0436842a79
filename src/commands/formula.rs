// src/commands/formula.rs

//! Formula inspection commands: list, info, validate

use anyhow::{Context, Result};
use std::path::Path;
use tapster::build::configure_args;
use tapster::formula::{builtin, load_formula, parse_formula_file, validate_formula};

/// List the built-in formulas
pub fn cmd_list() -> Result<()> {
    for formula in builtin::all().context("Built-in formula is invalid")? {
        println!(
            "{:<16} {:<10} {}",
            formula.name(),
            formula.version().unwrap_or_default(),
            formula.formula.description.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

/// Show a formula and its resolved configure line
pub fn cmd_info(spec: &str, prefix: &str) -> Result<()> {
    let formula = load_formula(spec).with_context(|| format!("Failed to load formula: {}", spec))?;
    let prefix = prefix.replace("<formula>", formula.name());

    println!("{} {}", formula.name(), formula.version().unwrap_or_default());
    if let Some(desc) = &formula.formula.description {
        println!("{}", desc);
    }
    if let Some(homepage) = &formula.formula.homepage {
        println!("{}", homepage);
    }
    println!();
    println!("License:   {}", formula.formula.license.as_deref().unwrap_or("unknown"));
    println!("Source:    {}", formula.source.url);
    println!("SHA-256:   {}", formula.source.sha256);
    if let Some(workdir) = &formula.build.workdir {
        println!("Workdir:   {}", workdir);
    }
    if !formula.platform.platforms.is_empty() {
        let platforms: Vec<String> =
            formula.platform.platforms.iter().map(|p| p.to_string()).collect();
        println!("Platforms: {}", platforms.join(", "));
    }
    if let Some(reason) = &formula.platform.keg_only {
        println!("Keg-only:  {} ({})", reason, reason.explanation());
    }

    let args = configure_args(&formula, Path::new(&prefix))?;
    println!();
    println!("./configure {}", args.join(" "));
    println!("make");
    println!("make install");

    Ok(())
}

/// Parse and validate a formula file
pub fn cmd_validate(path: &str) -> Result<()> {
    let path = Path::new(path);
    println!("Reading formula: {}", path.display());

    let formula = parse_formula_file(path)
        .with_context(|| format!("Failed to parse formula: {}", path.display()))?;
    let warnings = validate_formula(&formula).with_context(|| "Formula validation failed")?;

    for warning in &warnings {
        println!("Warning: {}", warning);
    }

    if warnings.is_empty() {
        println!("[OK] {} is valid", formula.name());
    } else {
        println!("[OK] {} is valid, {} warning(s)", formula.name(), warnings.len());
    }

    Ok(())
}
