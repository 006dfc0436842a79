// src/error.rs

//! Error types for formula loading and source builds

use crate::build::BuildPhase;
use std::path::PathBuf;
use thiserror::Error;

/// Result type used throughout tapster
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a formula or building it
#[derive(Error, Debug)]
pub enum Error {
    /// A build phase exited non-zero (or was killed by a signal)
    #[error("{phase} phase failed with exit code {}\n{stderr}", display_code(.code))]
    BuildFailed {
        phase: BuildPhase,
        code: Option<i32>,
        stderr: String,
    },

    /// A build phase could not be started at all
    #[error("Failed to run {phase} phase: {source}")]
    SpawnFailed {
        phase: BuildPhase,
        #[source]
        source: std::io::Error,
    },

    /// Formula file is not valid TOML or is missing fields
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Formula parsed but violates a format rule
    #[error("Invalid formula: {0}")]
    InvalidFormula(String),

    /// Host operating system is not in the formula's platform list
    #[error("Formula {formula} does not support {host}")]
    UnsupportedPlatform { formula: String, host: String },

    /// No configure script in the working directory
    #[error("No configure script found at {}", .0.display())]
    MissingConfigure(PathBuf),

    /// Prefix exists but is not a directory
    #[error("Invalid installation prefix: {}", .0.display())]
    InvalidPrefix(PathBuf),

    /// Build step was already run
    #[error("Build step has already been run")]
    AlreadyRun,

    /// Named item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Receipt serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

impl Error {
    /// The failing phase, for build errors
    pub fn phase(&self) -> Option<BuildPhase> {
        match self {
            Self::BuildFailed { phase, .. } | Self::SpawnFailed { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}
