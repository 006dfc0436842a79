// src/formula/parser.rs

//! Formula file parsing and validation

use super::builtin;
use crate::error::{Error, Result};
use crate::formula::format::Formula;
use std::path::{Component, Path};
use tracing::{debug, warn};

/// Parse a formula from a TOML string
pub fn parse_formula(content: &str) -> Result<Formula> {
    toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid formula: {}", e)))
}

/// Parse a formula from a file
pub fn parse_formula_file(path: &Path) -> Result<Formula> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::ParseError(format!("Failed to read formula file {}: {}", path.display(), e))
    })?;

    parse_formula(&content)
}

/// Validate a formula for completeness and correctness
///
/// Hard problems are returned as errors; soft ones as warnings.
pub fn validate_formula(formula: &Formula) -> Result<Vec<String>> {
    let mut warnings = Vec::new();
    let name = &formula.formula.name;

    if name.is_empty() {
        return Err(Error::InvalidFormula("formula name cannot be empty".to_string()));
    }
    if name.chars().any(|c| c.is_whitespace() || c == '/') {
        return Err(Error::InvalidFormula(format!("invalid formula name: {:?}", name)));
    }

    let url = &formula.source.url;
    if !(url.starts_with("https://") || url.starts_with("http://") || url.starts_with("file://")) {
        return Err(Error::InvalidFormula(format!(
            "unsupported source url: {} (expected http(s):// or file://)",
            url
        )));
    }

    formula.checksum()?;
    formula.require_version()?;

    for arg in &formula.build.configure_args {
        if arg == "--prefix" || arg.starts_with("--prefix=") {
            return Err(Error::InvalidFormula(format!(
                "configure argument {} sets the prefix; it is supplied at build time",
                arg
            )));
        }
    }

    if let Some(workdir) = &formula.build.workdir {
        let path = Path::new(workdir);
        if path.is_absolute() || path.components().any(|c| c == Component::ParentDir) {
            return Err(Error::InvalidFormula(format!(
                "workdir must be a relative path inside the source tree: {}",
                workdir
            )));
        }
    }

    if formula.build.jobs == Some(0) {
        return Err(Error::InvalidFormula("jobs must be at least 1".to_string()));
    }

    if formula.formula.description.is_none() {
        warnings.push("Missing formula description".to_string());
    }
    if formula.formula.license.is_none() {
        warnings.push("Missing formula license".to_string());
    }
    if formula.formula.homepage.is_none() {
        warnings.push("Missing formula homepage".to_string());
    }

    Ok(warnings)
}

/// Load a formula by built-in name or from a `.toml` path, then validate it
///
/// Validation warnings are logged, not returned.
pub fn load_formula(spec: &str) -> Result<Formula> {
    let path = Path::new(spec);
    let formula = if spec.ends_with(".toml") || path.is_file() {
        debug!("Loading formula from {}", path.display());
        parse_formula_file(path)?
    } else {
        builtin::find(spec)?
    };

    for warning in validate_formula(&formula)? {
        warn!("{}: {}", formula.name(), warning);
    }

    Ok(formula)
}
