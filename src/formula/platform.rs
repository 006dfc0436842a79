// src/formula/platform.rs

//! Platform constraints: keg-only reasons and supported operating systems

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumString};

/// Operating systems a formula can be restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Os {
    Linux,
    Macos,
}

impl Os {
    /// The OS this binary was built for, if it is one formulas know about
    pub fn host() -> Option<Os> {
        if cfg!(target_os = "linux") {
            Some(Os::Linux)
        } else if cfg!(target_os = "macos") {
            Some(Os::Macos)
        } else {
            None
        }
    }
}

/// Why a formula is installed keg-only (not linked into the shared prefix)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KegOnlyReason {
    /// macOS already ships this software
    ProvidedByMacos,
    /// macOS ships a different build under the same name
    ShadowedByMacos,
    /// Alternate version of another formula
    VersionedFormula,
    /// Free-form explanation
    #[serde(untagged)]
    Other(String),
}

impl KegOnlyReason {
    /// Human-readable explanation
    pub fn explanation(&self) -> &str {
        match self {
            Self::ProvidedByMacos => {
                "macOS already provides this software and installing another version in \
                 parallel can cause all kinds of trouble"
            }
            Self::ShadowedByMacos => "macOS provides a version of this software under the same name",
            Self::VersionedFormula => "this is an alternate version of another formula",
            Self::Other(reason) => reason,
        }
    }
}

impl fmt::Display for KegOnlyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProvidedByMacos => f.write_str("provided_by_macos"),
            Self::ShadowedByMacos => f.write_str("shadowed_by_macos"),
            Self::VersionedFormula => f.write_str("versioned_formula"),
            Self::Other(reason) => f.write_str(reason),
        }
    }
}

/// Platform section of a formula
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformSection {
    /// Keg-only reason, if any
    #[serde(default)]
    pub keg_only: Option<KegOnlyReason>,

    /// Supported operating systems (empty = any)
    #[serde(default)]
    pub platforms: Vec<Os>,
}

impl PlatformSection {
    /// Whether the given host OS satisfies the constraint
    pub fn supports(&self, host: Option<Os>) -> bool {
        if self.platforms.is_empty() {
            return true;
        }
        host.is_some_and(|os| self.platforms.contains(&os))
    }

    /// Fail with `UnsupportedPlatform` unless the host is supported
    pub fn check_host(&self, formula: &str) -> Result<()> {
        self.check(formula, Os::host())
    }

    pub(crate) fn check(&self, formula: &str, host: Option<Os>) -> Result<()> {
        if self.supports(host) {
            return Ok(());
        }
        Err(Error::UnsupportedPlatform {
            formula: formula.to_string(),
            host: host.map_or_else(|| std::env::consts::OS.to_string(), |os| os.to_string()),
        })
    }
}
