// src/build/config.rs

//! Configuration types for the build step

use std::collections::BTreeMap;
use tracing::warn;

/// Environment variable overriding the default job count
pub const JOBS_ENV: &str = "TAPSTER_JOBS";

/// Environment variable overriding the make program
pub const MAKE_ENV: &str = "TAPSTER_MAKE";

/// Configuration for a build step
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Number of parallel make jobs, exported as `MAKEFLAGS=-j<jobs>`
    pub jobs: u32,
    /// Program used for the build and install phases
    pub make_program: String,
    /// Extra environment for every phase, applied after the formula's own
    pub environment: BTreeMap<String, String>,
    /// Write `INSTALL_RECEIPT.json` into the prefix after a successful install
    pub write_receipt: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        let jobs = std::thread::available_parallelism()
            .map(|p| p.get() as u32)
            .unwrap_or(4);

        Self {
            jobs,
            make_program: "make".to_string(),
            environment: BTreeMap::new(),
            write_receipt: true,
        }
    }
}

impl BuildConfig {
    /// Defaults, overridden by `TAPSTER_JOBS` and `TAPSTER_MAKE`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(jobs) = lookup(JOBS_ENV) {
            match jobs.trim().parse::<u32>() {
                Ok(n) if n > 0 => config.jobs = n,
                _ => warn!("Ignoring invalid {}={:?}", JOBS_ENV, jobs),
            }
        }

        if let Some(make) = lookup(MAKE_ENV).filter(|m| !m.trim().is_empty()) {
            config.make_program = make;
        }

        config
    }

    /// Set the job count
    pub fn with_jobs(mut self, jobs: u32) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Set an extra environment variable
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }
}
