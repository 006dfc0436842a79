// src/build/runner.rs

//! Running phase commands as external processes

use super::phase::PhaseCommand;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Captured result of one external process
#[derive(Debug, Clone, Default)]
pub struct PhaseOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl PhaseOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs a phase command to completion
///
/// Implementations block until the process exits. They only report
/// failure to *start* the process as an error; a non-zero exit is
/// returned in [`PhaseOutput`] and judged by the caller.
pub trait CommandRunner {
    fn run(
        &self,
        command: &PhaseCommand,
        workdir: &Path,
        env: &[(String, String)],
    ) -> Result<PhaseOutput>;
}

/// Runs commands directly on the host with `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        command: &PhaseCommand,
        workdir: &Path,
        env: &[(String, String)],
    ) -> Result<PhaseOutput> {
        let program = resolve_program(&command.program, workdir);

        let output = Command::new(&program)
            .args(&command.args)
            .current_dir(workdir)
            .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .output()
            .map_err(|source| Error::SpawnFailed {
                phase: command.phase,
                source,
            })?;

        Ok(PhaseOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Anchor `./program` at the working directory
///
/// Whether a relative program path is resolved against the parent's or the
/// child's working directory is platform-specific, so make it absolute.
fn resolve_program(program: &str, workdir: &Path) -> PathBuf {
    match program.strip_prefix("./") {
        Some(rest) => workdir.join(rest),
        None => PathBuf::from(program),
    }
}
