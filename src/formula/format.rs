// src/formula/format.rs

//! Formula file format definitions
//!
//! Formulas are TOML files describing one library: where its source lives,
//! the archive checksum, license, platform constraint and the flags handed
//! to `./configure`. The build itself is always configure, make, make install.

use super::platform::PlatformSection;
use crate::error::{Error, Result};
use crate::hash::Sha256Digest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Archive extensions stripped before inferring a version from a file name
const ARCHIVE_EXTENSIONS: &[&str] = &[
    ".tar.gz", ".tgz", ".tar.xz", ".txz", ".tar.bz2", ".tbz2", ".tar.zst", ".tar", ".zip",
];

/// A complete formula
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formula {
    /// Formula metadata
    pub formula: FormulaSection,

    /// Source archive location and checksum
    pub source: SourceSection,

    /// Keg-only reason and supported platforms
    #[serde(default)]
    pub platform: PlatformSection,

    /// Configure flags and build environment
    #[serde(default)]
    pub build: BuildSection,
}

impl Formula {
    /// Formula name as written, including any `@` suffix
    pub fn name(&self) -> &str {
        &self.formula.name
    }

    /// Name without the versioned suffix (`icu4c@73` -> `icu4c`)
    pub fn base_name(&self) -> &str {
        self.formula
            .name
            .split_once('@')
            .map_or(self.formula.name.as_str(), |(base, _)| base)
    }

    /// The part after `@` for versioned formulas
    pub fn versioned_suffix(&self) -> Option<&str> {
        self.formula.name.split_once('@').map(|(_, suffix)| suffix)
    }

    /// Explicit version, or the one inferred from the archive name
    pub fn version(&self) -> Option<String> {
        self.formula
            .version
            .clone()
            .or_else(|| infer_version(&self.archive_filename()))
    }

    /// Version, or an error naming the formula
    pub fn require_version(&self) -> Result<String> {
        self.version().ok_or_else(|| {
            Error::InvalidFormula(format!(
                "cannot determine version of {} from {}",
                self.name(),
                self.source.url
            ))
        })
    }

    /// Archive file name, the last path segment of the source URL
    pub fn archive_filename(&self) -> String {
        self.source
            .url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string()
    }

    /// Parsed source checksum
    pub fn checksum(&self) -> Result<Sha256Digest> {
        Sha256Digest::new(self.source.sha256.as_str())
            .map_err(|e| Error::InvalidFormula(format!("source sha256: {}", e)))
    }

    /// Substitute variables in a string
    ///
    /// Replaces `%(name)s`, `%(version)s` and `%(prefix)s`.
    pub fn substitute(&self, template: &str, prefix: &str) -> String {
        let version = self.version().unwrap_or_default();
        template
            .replace("%(name)s", &self.formula.name)
            .replace("%(version)s", &version)
            .replace("%(prefix)s", prefix)
    }

    /// Whether this formula is keg-only
    pub fn is_keg_only(&self) -> bool {
        self.platform.keg_only.is_some()
    }
}

/// Formula metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormulaSection {
    /// Formula name, optionally versioned (`icu4c@73`)
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: Option<String>,

    /// Project homepage
    #[serde(default)]
    pub homepage: Option<String>,

    /// License identifier
    #[serde(default)]
    pub license: Option<String>,

    /// Version; inferred from the archive name when absent
    #[serde(default)]
    pub version: Option<String>,
}

/// Source archive section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    /// Archive URL
    pub url: String,

    /// SHA-256 of the archive, 64 hex digits
    pub sha256: String,
}

/// Build instructions section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildSection {
    /// Subdirectory of the extracted source tree to build in
    #[serde(default)]
    pub workdir: Option<String>,

    /// Flags for `./configure`, after the implicit `--prefix`
    ///
    /// Supports `%(name)s`, `%(version)s` and `%(prefix)s` substitution.
    #[serde(default)]
    pub configure_args: Vec<String>,

    /// Environment variables set for every phase
    #[serde(default)]
    pub environment: BTreeMap<String, String>,

    /// Parallel make jobs (default: build config)
    #[serde(default)]
    pub jobs: Option<u32>,
}

/// Infer a version from an archive file name
///
/// `icu4c-73_2-src.tgz` gives `73.2`, `nginx-1.24.0.tar.gz` gives `1.24.0`.
pub fn infer_version(filename: &str) -> Option<String> {
    let stem = ARCHIVE_EXTENSIONS
        .iter()
        .find_map(|ext| filename.strip_suffix(ext))
        .unwrap_or(filename);

    stem.split('-')
        .map(|seg| {
            seg.strip_prefix('v')
                .filter(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
                .unwrap_or(seg)
        })
        .find(|seg| seg.starts_with(|c: char| c.is_ascii_digit()))
        .map(|seg| seg.replace('_', "."))
}
