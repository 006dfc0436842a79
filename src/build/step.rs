// src/build/step.rs

//! BuildStep: configure, build and install one formula into a prefix

use super::config::BuildConfig;
use super::manifest::InstallManifest;
use super::phase::{plan, BuildPhase, PhaseCommand};
use super::receipt::InstallReceipt;
use super::runner::{CommandRunner, SystemRunner};
use super::state::BuildState;
use crate::error::{Error, Result};
use crate::formula::{validate_formula, Formula};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Outcome of one phase
#[derive(Debug, Clone)]
pub struct PhaseResult {
    pub phase: BuildPhase,
    pub argv: Vec<String>,
    pub code: Option<i32>,
    pub duration: Duration,
}

/// Result of a successful build step
#[derive(Debug)]
pub struct BuildOutcome {
    pub formula: String,
    pub version: String,
    /// Canonical prefix the build was configured with
    pub prefix: PathBuf,
    pub phases: Vec<PhaseResult>,
    /// Phase headers plus captured stdout/stderr
    pub log: String,
    /// Everything installed under the prefix
    pub manifest: InstallManifest,
    /// Path of the receipt, if one was written
    pub receipt: Option<PathBuf>,
}

/// A single build of one formula
///
/// Runs `./configure --prefix=<prefix> <flags>`, `make` and `make install`
/// in order inside the formula's working directory. The first phase to
/// exit non-zero aborts the build; nothing is retried. A step runs once.
pub struct BuildStep<'a> {
    formula: &'a Formula,
    config: &'a BuildConfig,
    runner: Arc<dyn CommandRunner>,
    state: BuildState,
    phases: Vec<PhaseResult>,
    log: String,
}

impl<'a> BuildStep<'a> {
    /// Create a build step that runs commands on the host
    pub fn new(formula: &'a Formula, config: &'a BuildConfig) -> Self {
        Self::with_runner(formula, config, Arc::new(SystemRunner))
    }

    /// Create a build step with a custom command runner
    pub fn with_runner(
        formula: &'a Formula,
        config: &'a BuildConfig,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            formula,
            config,
            runner,
            state: BuildState::NotStarted,
            phases: Vec::new(),
            log: String::new(),
        }
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Build log so far; still available after a failure
    pub fn log(&self) -> &str {
        &self.log
    }

    /// Phases that have run so far
    pub fn phases(&self) -> &[PhaseResult] {
        &self.phases
    }

    /// Directory the phases run in
    pub fn workdir(&self, source_root: &Path) -> PathBuf {
        match &self.formula.build.workdir {
            Some(wd) => source_root.join(wd),
            None => source_root.to_path_buf(),
        }
    }

    /// Run all three phases against an extracted source tree
    pub fn run(&mut self, source_root: &Path, prefix: &Path) -> Result<BuildOutcome> {
        if self.state != BuildState::NotStarted {
            return Err(Error::AlreadyRun);
        }

        let formula = self.formula;
        let name = formula.name();
        for warning in validate_formula(formula)? {
            debug!("{}: {}", name, warning);
        }
        formula.platform.check_host(name)?;
        let version = formula.require_version()?;

        let workdir = self.workdir(source_root);
        let configure = workdir.join("configure");
        if !configure.is_file() {
            return Err(Error::MissingConfigure(configure));
        }

        let prefix = prepare_prefix(prefix)?;
        let commands = plan(formula, self.config, &prefix)?;
        let env = self.environment();

        info!("Building {} {} into {}", name, version, prefix.display());
        debug!("Working directory: {}", workdir.display());

        for command in &commands {
            self.run_phase(command, &workdir, &env)?;
        }
        self.transition(BuildState::Done);

        let manifest = InstallManifest::scan(&prefix)?;
        if manifest.file_count() == 0 {
            warn!("Install phase put no files under {}", prefix.display());
        }

        let receipt = if self.config.write_receipt {
            let receipt = InstallReceipt::new(
                formula,
                &version,
                &commands[0].args,
                manifest.file_count(),
            );
            Some(receipt.write(&prefix)?)
        } else {
            None
        };

        info!(
            "Installed {} {} ({} files)",
            name,
            version,
            manifest.file_count()
        );

        Ok(BuildOutcome {
            formula: name.to_string(),
            version,
            prefix,
            phases: self.phases.clone(),
            log: self.log.clone(),
            manifest,
            receipt,
        })
    }

    /// Environment for every phase: MAKEFLAGS, then the formula's, then the config's
    fn environment(&self) -> Vec<(String, String)> {
        let jobs = self.formula.build.jobs.unwrap_or(self.config.jobs).max(1);
        let mut env = vec![("MAKEFLAGS".to_string(), format!("-j{}", jobs))];

        env.extend(
            self.formula
                .build
                .environment
                .iter()
                .chain(&self.config.environment)
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        env
    }

    fn run_phase(
        &mut self,
        command: &PhaseCommand,
        workdir: &Path,
        env: &[(String, String)],
    ) -> Result<()> {
        let phase = command.phase;
        self.transition(BuildState::running(phase));
        info!("Running {} phase", phase);
        debug!("Command: {}", command);

        let started = Instant::now();
        let output = match self.runner.run(command, workdir, env) {
            Ok(output) => output,
            Err(e) => {
                self.transition(BuildState::Failed(phase));
                return Err(e);
            }
        };

        self.phases.push(PhaseResult {
            phase,
            argv: command.argv(),
            code: output.code,
            duration: started.elapsed(),
        });
        self.log_output(phase, &output.stdout, &output.stderr);

        if !output.success() {
            self.transition(BuildState::Failed(phase));
            return Err(Error::BuildFailed {
                phase,
                code: output.code,
                stderr: output.stderr,
            });
        }

        Ok(())
    }

    fn transition(&mut self, next: BuildState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        debug!("{}: {} -> {}", self.formula.name(), self.state, next);
        self.state = next;
    }

    fn log_output(&mut self, phase: BuildPhase, stdout: &str, stderr: &str) {
        self.log.push_str(&format!("=== {} ===\n", phase));
        for stream in [stdout, stderr] {
            if !stream.is_empty() {
                self.log.push_str(stream);
                if !stream.ends_with('\n') {
                    self.log.push('\n');
                }
            }
        }
    }
}

/// Create the prefix if needed and return its canonical path
fn prepare_prefix(prefix: &Path) -> Result<PathBuf> {
    if prefix.exists() && !prefix.is_dir() {
        return Err(Error::InvalidPrefix(prefix.to_path_buf()));
    }
    fs::create_dir_all(prefix)?;
    Ok(fs::canonicalize(prefix)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::runner::PhaseOutput;
    use crate::formula::builtin;
    use std::sync::Mutex;

    /// Records every command and fails the configured phase
    #[derive(Default)]
    struct RecordingRunner {
        calls: Mutex<Vec<PhaseCommand>>,
        fail: Option<(BuildPhase, Option<i32>)>,
    }

    impl RecordingRunner {
        fn failing(phase: BuildPhase, code: i32) -> Self {
            Self {
                fail: Some((phase, Some(code))),
                ..Default::default()
            }
        }

        /// The phase dies from a signal and reports no exit code
        fn killed(phase: BuildPhase) -> Self {
            Self {
                fail: Some((phase, None)),
                ..Default::default()
            }
        }

        fn phases(&self) -> Vec<BuildPhase> {
            self.calls.lock().unwrap().iter().map(|c| c.phase).collect()
        }
    }

    impl CommandRunner for RecordingRunner {
        fn run(
            &self,
            command: &PhaseCommand,
            _workdir: &Path,
            _env: &[(String, String)],
        ) -> Result<PhaseOutput> {
            self.calls.lock().unwrap().push(command.clone());
            match self.fail {
                Some((phase, code)) if phase == command.phase => Ok(PhaseOutput {
                    code,
                    stdout: String::new(),
                    stderr: format!("{} exploded", phase),
                }),
                _ => Ok(PhaseOutput {
                    code: Some(0),
                    stdout: format!("{} ok", command.phase),
                    stderr: String::new(),
                }),
            }
        }
    }

    fn source_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("source")).unwrap();
        fs::write(dir.path().join("source/configure"), "#!/bin/sh\n").unwrap();
        dir
    }

    #[test]
    fn test_runs_phases_in_order() {
        let formula = builtin::find("icu4c@73").unwrap();
        let config = BuildConfig::default();
        let runner = Arc::new(RecordingRunner::default());
        let src = source_tree();
        let prefix = tempfile::tempdir().unwrap();

        let mut step = BuildStep::with_runner(&formula, &config, runner.clone());
        let outcome = step.run(src.path(), prefix.path()).unwrap();

        assert_eq!(
            runner.phases(),
            [BuildPhase::Configure, BuildPhase::Build, BuildPhase::Install]
        );
        assert_eq!(step.state(), BuildState::Done);
        assert_eq!(outcome.version, "73.2");
        assert_eq!(outcome.phases.len(), 3);
        assert!(outcome.log.contains("=== install ===\ninstall ok\n"));
        assert!(outcome.receipt.is_some());
    }

    #[test]
    fn test_configure_failure_stops_build() {
        let formula = builtin::find("icu4c@73").unwrap();
        let config = BuildConfig::default();
        let runner = Arc::new(RecordingRunner::failing(BuildPhase::Configure, 1));
        let src = source_tree();
        let prefix = tempfile::tempdir().unwrap();

        let mut step = BuildStep::with_runner(&formula, &config, runner.clone());
        let err = step.run(src.path(), prefix.path()).unwrap_err();

        match err {
            Error::BuildFailed { phase, code, stderr } => {
                assert_eq!(phase, BuildPhase::Configure);
                assert_eq!(code, Some(1));
                assert_eq!(stderr, "configure exploded");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(runner.phases(), [BuildPhase::Configure]);
        assert_eq!(step.state(), BuildState::Failed(BuildPhase::Configure));
        assert!(step.log().contains("configure exploded"));
    }

    #[test]
    fn test_killed_phase_has_no_exit_code() {
        let formula = builtin::find("icu4c@73").unwrap();
        let config = BuildConfig::default();
        let runner = Arc::new(RecordingRunner::killed(BuildPhase::Build));
        let src = source_tree();
        let prefix = tempfile::tempdir().unwrap();

        let mut step = BuildStep::with_runner(&formula, &config, runner.clone());
        let err = step.run(src.path(), prefix.path()).unwrap_err();

        assert!(matches!(
            err,
            Error::BuildFailed {
                phase: BuildPhase::Build,
                code: None,
                ..
            }
        ));
        assert!(err.to_string().starts_with("build phase failed"));
        assert_eq!(runner.phases(), [BuildPhase::Configure, BuildPhase::Build]);
        assert_eq!(step.state(), BuildState::Failed(BuildPhase::Build));
        assert_eq!(step.phases()[1].code, None);
    }

    #[test]
    fn test_install_failure() {
        let formula = builtin::find("icu4c@73").unwrap();
        let config = BuildConfig::default();
        let runner = Arc::new(RecordingRunner::failing(BuildPhase::Install, 2));
        let src = source_tree();
        let prefix = tempfile::tempdir().unwrap();

        let mut step = BuildStep::with_runner(&formula, &config, runner.clone());
        let err = step.run(src.path(), prefix.path()).unwrap_err();
        assert_eq!(err.phase(), Some(BuildPhase::Install));
        assert_eq!(runner.phases().len(), 3);
        assert_eq!(step.phases().len(), 3);
        assert!(!prefix.path().join(crate::build::RECEIPT_FILE).exists());
    }

    #[test]
    fn test_configure_gets_prefix_once() {
        let formula = builtin::find("icu4c@73").unwrap();
        let config = BuildConfig::default();
        let runner = Arc::new(RecordingRunner::default());
        let src = source_tree();
        let prefix = tempfile::tempdir().unwrap();

        let mut step = BuildStep::with_runner(&formula, &config, runner.clone());
        let outcome = step.run(src.path(), prefix.path()).unwrap();

        let calls = runner.calls.lock().unwrap();
        let expected = format!("--prefix={}", outcome.prefix.display());
        let count = calls[0].args.iter().filter(|a| **a == expected).count();
        assert_eq!(count, 1);
        assert_eq!(
            calls[0].args.iter().filter(|a| a.starts_with("--prefix")).count(),
            1
        );
    }

    #[test]
    fn test_missing_configure() {
        let formula = builtin::find("icu4c@73").unwrap();
        let config = BuildConfig::default();
        let runner = Arc::new(RecordingRunner::default());
        let src = tempfile::tempdir().unwrap();
        let prefix = tempfile::tempdir().unwrap();

        let mut step = BuildStep::with_runner(&formula, &config, runner.clone());
        let err = step.run(src.path(), prefix.path()).unwrap_err();
        assert!(matches!(err, Error::MissingConfigure(_)));
        assert!(runner.phases().is_empty());
        assert_eq!(step.state(), BuildState::NotStarted);
    }

    #[test]
    fn test_invalid_formula_runs_nothing() {
        let config = BuildConfig::default();
        let src = source_tree();
        let prefix = tempfile::tempdir().unwrap();

        let mut with_prefix = builtin::find("icu4c@73").unwrap();
        with_prefix.build.configure_args.push("--prefix=/usr".to_string());
        let mut escaping = builtin::find("icu4c@73").unwrap();
        escaping.build.workdir = Some("../source".to_string());

        for formula in [&with_prefix, &escaping] {
            let runner = Arc::new(RecordingRunner::default());
            let mut step = BuildStep::with_runner(formula, &config, runner.clone());
            let err = step.run(src.path(), prefix.path()).unwrap_err();
            assert!(matches!(err, Error::InvalidFormula(_)));
            assert!(runner.phases().is_empty());
            assert_eq!(step.state(), BuildState::NotStarted);
        }
    }

    #[test]
    fn test_prefix_is_a_file() {
        let formula = builtin::find("icu4c@73").unwrap();
        let config = BuildConfig::default();
        let src = source_tree();
        let file = tempfile::NamedTempFile::new().unwrap();

        let mut step =
            BuildStep::with_runner(&formula, &config, Arc::new(RecordingRunner::default()));
        let err = step.run(src.path(), file.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidPrefix(_)));
    }

    #[test]
    fn test_step_runs_once() {
        let formula = builtin::find("icu4c@73").unwrap();
        let config = BuildConfig::default();
        let src = source_tree();
        let prefix = tempfile::tempdir().unwrap();

        let mut step =
            BuildStep::with_runner(&formula, &config, Arc::new(RecordingRunner::default()));
        step.run(src.path(), prefix.path()).unwrap();
        assert!(matches!(
            step.run(src.path(), prefix.path()),
            Err(Error::AlreadyRun)
        ));
    }

    #[test]
    fn test_environment_order() {
        let mut formula = builtin::find("icu4c@73").unwrap();
        formula.build.jobs = Some(2);
        formula
            .build
            .environment
            .insert("CFLAGS".to_string(), "-O2".to_string());
        let config = BuildConfig::default().with_env("CFLAGS", "-O0");

        let step = BuildStep::new(&formula, &config);
        let env = step.environment();
        assert_eq!(env[0], ("MAKEFLAGS".to_string(), "-j2".to_string()));
        assert_eq!(
            env.iter().rev().find(|(k, _)| k == "CFLAGS").map(|(_, v)| v.as_str()),
            Some("-O0")
        );
    }

    #[test]
    fn test_zero_jobs_runs_serially() {
        let mut formula = builtin::find("icu4c@73").unwrap();
        formula.build.jobs = Some(0);
        let config = BuildConfig::default();

        let env = BuildStep::new(&formula, &config).environment();
        assert_eq!(env[0], ("MAKEFLAGS".to_string(), "-j1".to_string()));
    }

    #[test]
    fn test_no_receipt_when_disabled() {
        let formula = builtin::find("icu4c@73").unwrap();
        let config = BuildConfig {
            write_receipt: false,
            ..Default::default()
        };
        let src = source_tree();
        let prefix = tempfile::tempdir().unwrap();

        let mut step =
            BuildStep::with_runner(&formula, &config, Arc::new(RecordingRunner::default()));
        let outcome = step.run(src.path(), prefix.path()).unwrap();
        assert!(outcome.receipt.is_none());
        assert!(outcome.manifest.is_empty());
    }
}
