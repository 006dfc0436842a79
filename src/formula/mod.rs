// src/formula/mod.rs

//! Formulas: declarative recipes for building a library from source
//!
//! A formula names a library, where its source archive lives, the archive
//! checksum, its license, an optional platform constraint, and the flags
//! handed to `./configure`. Formulas are immutable once loaded and are
//! consumed by a [`BuildStep`](crate::build::BuildStep).
//!
//! # Example Formula
//!
//! ```toml
//! [formula]
//! name = "icu4c@73"
//! description = "C/C++ and Java libraries for Unicode and globalization"
//! license = "GPL"
//!
//! [source]
//! url = "https://github.com/unicode-org/icu/releases/download/release-73-2/icu4c-73_2-src.tgz"
//! sha256 = "818a80712ed3caacd9b652305e01afc7fa167e6f2e94996da44b90c2ab604ce1"
//!
//! [platform]
//! keg_only = "provided_by_macos"
//!
//! [build]
//! workdir = "source"
//! configure_args = ["--disable-samples", "--disable-tests"]
//! ```
//!
//! The version is inferred from the archive name (`73.2` above) unless
//! `[formula] version` is given. `--prefix` is never written in a formula;
//! the build step supplies it.

pub mod builtin;
mod format;
pub mod parser;
mod platform;

pub use format::{infer_version, BuildSection, Formula, FormulaSection, SourceSection};
pub use parser::{load_formula, parse_formula, parse_formula_file, validate_formula};
pub use platform::{KegOnlyReason, Os, PlatformSection};
