// src/lib.rs

//! Tapster: formula-driven source builds
//!
//! A formula describes one library: its source archive, checksum, license,
//! platform constraint and configure flags. A [`BuildStep`] takes a formula,
//! an extracted source tree and an installation prefix, and runs the fixed
//! `./configure` → `make` → `make install` sequence, aborting on the first
//! phase that exits non-zero.
//!
//! # Architecture
//!
//! - Formulas: immutable TOML records, built-in or loaded from disk
//! - Build step: three sequential external processes, no retries
//! - Manifest: SHA-256 snapshot of the populated prefix
//! - Receipt: JSON record of how the prefix was built

pub mod build;
mod error;
pub mod formula;
pub mod hash;

pub use build::{BuildConfig, BuildOutcome, BuildPhase, BuildState, BuildStep, InstallManifest};
pub use error::{Error, Result};
pub use formula::{load_formula, parse_formula, Formula};
pub use hash::Sha256Digest;
