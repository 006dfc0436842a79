// src/formula/builtin.rs

//! Formulas compiled into the binary

use super::format::Formula;
use super::parser::parse_formula;
use crate::error::{Error, Result};

/// (name, TOML source) for every built-in formula
const BUILTIN: &[(&str, &str)] = &[(
    "icu4c@73",
    include_str!("../../formulas/icu4c@73.toml"),
)];

/// Names of all built-in formulas
pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTIN.iter().map(|(name, _)| *name)
}

/// Parse every built-in formula
pub fn all() -> Result<Vec<Formula>> {
    BUILTIN.iter().map(|(_, source)| parse_formula(source)).collect()
}

/// Find a built-in formula by full name, or by base name when unambiguous
///
/// `icu4c@73` and `icu4c` both resolve as long as only one `icu4c@*` exists.
pub fn find(name: &str) -> Result<Formula> {
    if let Some((_, source)) = BUILTIN.iter().find(|(n, _)| *n == name) {
        return parse_formula(source);
    }

    let mut by_base = BUILTIN
        .iter()
        .filter(|(n, _)| n.split_once('@').is_some_and(|(base, _)| base == name));

    match (by_base.next(), by_base.next()) {
        (Some((_, source)), None) => parse_formula(source),
        (Some(_), Some(_)) => Err(Error::NotFound(format!(
            "formula {} is ambiguous; use a versioned name",
            name
        ))),
        _ => Err(Error::NotFound(format!("no formula named {}", name))),
    }
}
