// src/build/manifest.rs

//! Snapshot of what a build installed under its prefix
//!
//! The manifest lists every directory, file and symlink below the prefix
//! in a stable order, with sizes, modes and SHA-256 digests for files.
//! Two builds produced the same tree exactly when their manifests are equal.

use super::receipt::RECEIPT_FILE;
use crate::error::{Error, Result};
use crate::hash::{hash_file, Sha256Digest};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Kind-specific data for a manifest entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntryKind {
    Dir,
    File {
        size: u64,
        mode: u32,
        sha256: Sha256Digest,
    },
    Symlink {
        target: String,
    },
}

/// One path below the prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Path relative to the prefix, `/`-separated
    pub path: String,
    #[serde(flatten)]
    pub kind: EntryKind,
}

/// Ordered listing of an installation prefix
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallManifest {
    pub entries: Vec<ManifestEntry>,
}

impl InstallManifest {
    /// Walk `prefix` and record everything below it
    ///
    /// The install receipt at the top of the prefix is skipped.
    pub fn scan(prefix: &Path) -> Result<Self> {
        let mut entries = Vec::new();

        for entry in WalkDir::new(prefix).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::from)?;

            let relative = entry
                .path()
                .strip_prefix(prefix)
                .map_err(|_| Error::InvalidPrefix(entry.path().to_path_buf()))?;
            if entry.depth() == 1 && relative == Path::new(RECEIPT_FILE) {
                continue;
            }

            let path = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            let file_type = entry.file_type();
            let kind = if file_type.is_symlink() {
                EntryKind::Symlink {
                    target: fs::read_link(entry.path())?.to_string_lossy().into_owned(),
                }
            } else if file_type.is_dir() {
                EntryKind::Dir
            } else {
                let metadata = entry.metadata().map_err(std::io::Error::from)?;
                EntryKind::File {
                    size: metadata.len(),
                    mode: file_mode(&metadata),
                    sha256: hash_file(entry.path())?,
                }
            };

            entries.push(ManifestEntry { path, kind });
        }

        Ok(Self { entries })
    }

    /// Number of regular files
    pub fn file_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.kind, EntryKind::File { .. }))
            .count()
    }

    /// Total size of regular files in bytes
    pub fn total_size(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| match e.kind {
                EntryKind::File { size, .. } => size,
                _ => 0,
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.iter().any(|e| e.path == path)
    }
}

#[cfg(unix)]
fn file_mode(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn file_mode(metadata: &fs::Metadata) -> u32 {
    if metadata.permissions().readonly() { 0o444 } else { 0o644 }
}
