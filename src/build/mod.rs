// src/build/mod.rs

//! Build step: turn an extracted source tree into a populated prefix
//!
//! Every formula builds the same way:
//!
//! 1. **configure** - `./configure --prefix=<prefix> <formula flags>`
//! 2. **build** - `make`
//! 3. **install** - `make install`
//!
//! Phases run sequentially in the formula's working directory and each
//! one is awaited before the next starts. The first non-zero exit aborts
//! the build with [`Error::BuildFailed`](crate::Error::BuildFailed).
//!
//! Fetching and extracting the source archive, verifying its checksum and
//! linking the prefix anywhere else are the caller's business.

mod config;
mod manifest;
mod phase;
mod receipt;
mod runner;
mod state;
mod step;

pub use config::{BuildConfig, JOBS_ENV, MAKE_ENV};
pub use manifest::{EntryKind, InstallManifest, ManifestEntry};
pub use phase::{configure_args, plan, BuildPhase, PhaseCommand, CONFIGURE_SCRIPT};
pub use receipt::{InstallReceipt, ReceiptSource, RECEIPT_FILE};
pub use runner::{CommandRunner, PhaseOutput, SystemRunner};
pub use state::BuildState;
pub use step::{BuildOutcome, BuildStep, PhaseResult};
