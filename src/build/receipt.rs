// src/build/receipt.rs

//! Install receipt written into the prefix after a successful build

use crate::error::Result;
use crate::formula::Formula;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the receipt, at the top of the prefix
pub const RECEIPT_FILE: &str = "INSTALL_RECEIPT.json";

/// Where the source came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptSource {
    pub url: String,
    pub sha256: String,
}

/// Record of how a prefix was populated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallReceipt {
    pub formula: String,
    pub version: String,
    #[serde(default)]
    pub license: Option<String>,
    /// Keg-only reason; keg-only prefixes are never linked
    #[serde(default)]
    pub keg_only: Option<String>,
    pub configure_args: Vec<String>,
    pub source: ReceiptSource,
    pub files: usize,
    pub built_at: DateTime<Utc>,
    pub built_by: String,
}

impl InstallReceipt {
    pub fn new(formula: &Formula, version: &str, configure_args: &[String], files: usize) -> Self {
        Self {
            formula: formula.name().to_string(),
            version: version.to_string(),
            license: formula.formula.license.clone(),
            keg_only: formula.platform.keg_only.as_ref().map(|r| r.to_string()),
            configure_args: configure_args.to_vec(),
            source: ReceiptSource {
                url: formula.source.url.clone(),
                sha256: formula.source.sha256.to_lowercase(),
            },
            files,
            built_at: Utc::now(),
            built_by: concat!("tapster ", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Write the receipt into `prefix`, returning its path
    pub fn write(&self, prefix: &Path) -> Result<PathBuf> {
        let path = prefix.join(RECEIPT_FILE);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json + "\n")?;
        Ok(path)
    }

    /// Read the receipt from `prefix`
    pub fn read(prefix: &Path) -> Result<Self> {
        let content = fs::read_to_string(prefix.join(RECEIPT_FILE))?;
        Ok(serde_json::from_str(&content)?)
    }
}
