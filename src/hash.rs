// src/hash.rs

//! SHA-256 helpers for formula checksums and install manifests
//!
//! Formulas carry the SHA-256 of their source archive. tapster does not
//! download archives, so the checksum is only validated for shape here.
//! The same digest is used to fingerprint every file written to a prefix.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

/// Length of a SHA-256 digest as a hex string
pub const SHA256_HEX_LEN: usize = 64;

/// Checksum parsing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecksumError {
    /// Digest string has the wrong length
    InvalidLength { expected: usize, got: usize },
    /// Digest string contains non-hex characters
    InvalidHex(String),
}

impl fmt::Display for ChecksumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { expected, got } => {
                write!(f, "invalid sha256 length: expected {}, got {}", expected, got)
            }
            Self::InvalidHex(s) => write!(f, "invalid hex in sha256: {}", s),
        }
    }
}

impl std::error::Error for ChecksumError {}

/// A validated, lowercase SHA-256 hex digest
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Validate and normalize a hex digest
    pub fn new(value: impl Into<String>) -> Result<Self, ChecksumError> {
        let value = value.into();

        if value.len() != SHA256_HEX_LEN {
            return Err(ChecksumError::InvalidLength {
                expected: SHA256_HEX_LEN,
                got: value.len(),
            });
        }

        if !value.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ChecksumError::InvalidHex(value));
        }

        Ok(Self(value.to_lowercase()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Sha256Digest {
    type Err = ChecksumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Sha256Digest {
    type Error = ChecksumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Sha256Digest> for String {
    fn from(digest: Sha256Digest) -> Self {
        digest.0
    }
}

/// Compute the SHA-256 of a byte slice
pub fn sha256(data: &[u8]) -> Sha256Digest {
    Sha256Digest(hex::encode(Sha256::digest(data)))
}

/// Compute the SHA-256 of everything a reader yields
pub fn hash_reader<R: Read>(reader: &mut R) -> io::Result<Sha256Digest> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(Sha256Digest(hex::encode(hasher.finalize())))
}

/// Compute the SHA-256 of a file, streaming its contents
pub fn hash_file(path: &Path) -> io::Result<Sha256Digest> {
    let mut file = File::open(path)?;
    hash_reader(&mut file)
}
