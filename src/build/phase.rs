// src/build/phase.rs

//! The three build phases and the commands they run

use super::config::BuildConfig;
use crate::error::{Error, Result};
use crate::formula::Formula;
use std::fmt;
use std::path::Path;
use strum_macros::{Display, EnumIter};

/// Program run for the configure phase, relative to the working directory
pub const CONFIGURE_SCRIPT: &str = "./configure";

/// One phase of the fixed configure -> build -> install sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum BuildPhase {
    Configure,
    Build,
    Install,
}

/// A fully resolved external command for one phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseCommand {
    pub phase: BuildPhase,
    pub program: String,
    pub args: Vec<String>,
}

impl PhaseCommand {
    /// Program followed by its arguments
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }
}

impl fmt::Display for PhaseCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv().join(" "))
    }
}

/// Configure arguments: `--prefix=<prefix>` first, then the formula's flags
///
/// The formula's flags are substituted against the same prefix.
pub fn configure_args(formula: &Formula, prefix: &Path) -> Result<Vec<String>> {
    let prefix = prefix
        .to_str()
        .ok_or_else(|| Error::InvalidPrefix(prefix.to_path_buf()))?;

    let mut args = Vec::with_capacity(formula.build.configure_args.len() + 1);
    args.push(format!("--prefix={}", prefix));
    args.extend(
        formula
            .build
            .configure_args
            .iter()
            .map(|arg| formula.substitute(arg, prefix)),
    );
    Ok(args)
}

/// Resolve the commands for all three phases, in order
pub fn plan(formula: &Formula, config: &BuildConfig, prefix: &Path) -> Result<Vec<PhaseCommand>> {
    Ok(vec![
        PhaseCommand {
            phase: BuildPhase::Configure,
            program: CONFIGURE_SCRIPT.to_string(),
            args: configure_args(formula, prefix)?,
        },
        PhaseCommand {
            phase: BuildPhase::Build,
            program: config.make_program.clone(),
            args: Vec::new(),
        },
        PhaseCommand {
            phase: BuildPhase::Install,
            program: config.make_program.clone(),
            args: vec!["install".to_string()],
        },
    ])
}
