// crates/apiprobe-engine/src/engine.rs
// ============================================================================
// Module: Test Engine
// Description: Discovery, scheduling modes, and whole-mode retry.
// Purpose: Execute a discovered artifact suite and aggregate its results.
// Dependencies: apiprobe-core, crate::context, crate::runner
// ============================================================================

//! ## Overview
//! The engine executes one artifact suite under a caller-selected mode.
//! Sequential mode runs artifacts in discovery order (lexicographic path
//! sort). Parallel mode drains a shared work queue from a bounded worker
//! pool and collects results in completion order; a panic inside one
//! worker unit becomes a synthetic Errored result instead of aborting the
//! batch. Containerized mode delegates the whole suite to a single
//! external orchestrator invocation and maps its exit code onto one
//! aggregate result.
//! Invariants:
//! - The runner binary is probed exactly once before any artifact runs.
//! - A timeout or failure in one unit never halts sibling units.
//! - Retry re-invokes the entire selected mode, never individual
//!   artifacts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::VecDeque;
use std::panic;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Mutex;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use apiprobe_core::ExecutionResults;
use apiprobe_core::TestResult;
use thiserror::Error;

use crate::context::ExecutionContext;
use crate::runner::RunnerCommand;
use crate::runner::run_process;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Artifact file extension discovered by the engine.
const ARTIFACT_EXTENSION: &str = "bats";

/// Default container orchestrator binary.
pub const DEFAULT_ORCHESTRATOR: &str = "docker-compose";

/// Label used for the single containerized-mode result.
const CONTAINER_LABEL: &str = "docker-compose";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Fatal engine errors raised before or instead of any artifact result.
///
/// # Invariants
/// - Per-artifact failures are never surfaced here; they become failing
///   [`TestResult`] values in the aggregate.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The external runner binary cannot be invoked.
    #[error("test runner '{0}' is not installed or not available")]
    RunnerUnavailable(String),
    /// The artifact directory holds no artifacts.
    #[error("no test artifacts found in {0}")]
    NoArtifacts(String),
    /// Artifact discovery failed on an I/O error.
    #[error("artifact discovery failed: {0}")]
    Discovery(String),
}

// ============================================================================
// SECTION: Discovery
// ============================================================================

/// Discovers artifact files under a directory, recursively.
///
/// Paths are sorted lexicographically so sequential execution order is
/// deterministic. A missing directory yields an empty list.
///
/// # Errors
///
/// Returns [`ExecError::Discovery`] when a directory cannot be read.
pub fn discover_artifacts(dir: &Path) -> Result<Vec<PathBuf>, ExecError> {
    let mut found = Vec::new();
    if dir.exists() {
        collect_artifacts(dir, &mut found)?;
    }
    found.sort();
    Ok(found)
}

/// Walks one directory level, recursing into subdirectories.
fn collect_artifacts(dir: &Path, found: &mut Vec<PathBuf>) -> Result<(), ExecError> {
    let entries =
        std::fs::read_dir(dir).map_err(|err| ExecError::Discovery(err.to_string()))?;
    for entry in entries {
        let entry = entry.map_err(|err| ExecError::Discovery(err.to_string()))?;
        let path = entry.path();
        if path.is_dir() {
            collect_artifacts(&path, found)?;
        } else if path.extension().is_some_and(|ext| ext == ARTIFACT_EXTENSION) {
            found.push(path);
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Modes and Settings
// ============================================================================

/// Observer invoked with each result as it is recorded.
pub type ResultHook<'a> = &'a (dyn Fn(&TestResult) + Sync);

/// Container orchestrator invocation for the containerized mode.
///
/// # Invariants
/// - The whole suite maps onto one external invocation and one aggregate
///   result; per-artifact granularity is lost by design.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeRunner {
    /// Orchestrator binary.
    pub program: String,
    /// Orchestration file describing the test services.
    pub compose_file: PathBuf,
}

impl ComposeRunner {
    /// Creates an orchestrator invocation over the default binary.
    #[must_use]
    pub fn new(compose_file: PathBuf) -> Self {
        Self {
            program: DEFAULT_ORCHESTRATOR.to_string(),
            compose_file,
        }
    }

    /// Runs the whole suite as one orchestrator invocation.
    fn run(&self, context: &ExecutionContext, timeout: Duration) -> TestResult {
        let mut command = Command::new(&self.program);
        command
            .arg("-f")
            .arg(&self.compose_file)
            .args(["up", "--build", "--abort-on-container-exit"])
            .envs(context.env_vars());
        run_process(CONTAINER_LABEL, &mut command, timeout)
    }
}

/// Caller-selected execution mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Artifacts run one at a time, in discovery order.
    Sequential,
    /// Up to `max_parallel` artifacts run concurrently.
    Parallel,
    /// The whole suite is delegated to a container orchestrator.
    Container(ComposeRunner),
}

/// Engine tuning knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Upper bound on simultaneously running artifacts in parallel mode.
    pub max_parallel: usize,
    /// Per-artifact timeout (overall timeout in containerized mode).
    pub timeout: Duration,
    /// Additional whole-mode re-invocations after a failing pass.
    pub retry_failed: u32,
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Executes a rendered artifact suite and aggregates the outcome.
#[derive(Debug)]
pub struct TestEngine {
    /// External runner wrapper.
    runner: RunnerCommand,
    /// Tuning knobs.
    settings: EngineSettings,
}

impl TestEngine {
    /// Creates an engine over a runner and settings.
    #[must_use]
    pub const fn new(runner: RunnerCommand, settings: EngineSettings) -> Self {
        Self {
            runner,
            settings,
        }
    }

    /// Executes the suite under the selected mode, retrying whole failing
    /// passes up to the configured retry budget.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] for fatal setup failures; per-artifact
    /// failures surface only in the aggregate.
    pub fn execute(
        &self,
        artifact_dir: &Path,
        mode: &ExecutionMode,
        context: &ExecutionContext,
        hook: Option<ResultHook<'_>>,
    ) -> Result<ExecutionResults, ExecError> {
        let started = Instant::now();
        let mut attempts: u32 = 0;
        loop {
            let results = self.run_once(artifact_dir, mode, context, hook)?;
            let summary = ExecutionResults::aggregate(results, started.elapsed());
            if summary.success || attempts >= self.settings.retry_failed {
                return Ok(summary);
            }
            attempts += 1;
        }
    }

    /// Runs one pass of the selected mode.
    fn run_once(
        &self,
        artifact_dir: &Path,
        mode: &ExecutionMode,
        context: &ExecutionContext,
        hook: Option<ResultHook<'_>>,
    ) -> Result<Vec<TestResult>, ExecError> {
        match mode {
            ExecutionMode::Sequential | ExecutionMode::Parallel => {
                self.runner.probe()?;
                let artifacts = discover_artifacts(artifact_dir)?;
                if artifacts.is_empty() {
                    return Err(ExecError::NoArtifacts(artifact_dir.display().to_string()));
                }
                if matches!(mode, ExecutionMode::Sequential) {
                    Ok(self.run_sequential(&artifacts, context, hook))
                } else {
                    Ok(self.run_parallel(&artifacts, context, hook))
                }
            }
            ExecutionMode::Container(compose) => {
                let result = compose.run(context, self.settings.timeout);
                if let Some(hook) = hook {
                    hook(&result);
                }
                Ok(vec![result])
            }
        }
    }

    /// Runs artifacts one at a time, in discovery order.
    fn run_sequential(
        &self,
        artifacts: &[PathBuf],
        context: &ExecutionContext,
        hook: Option<ResultHook<'_>>,
    ) -> Vec<TestResult> {
        let mut results = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            let result = self.runner.run(artifact, context, self.settings.timeout);
            if let Some(hook) = hook {
                hook(&result);
            }
            results.push(result);
        }
        results
    }

    /// Runs artifacts from a shared queue under a bounded worker pool.
    ///
    /// Results are collected in completion order. A panic inside one unit
    /// of work is converted into a synthetic Errored result.
    fn run_parallel(
        &self,
        artifacts: &[PathBuf],
        context: &ExecutionContext,
        hook: Option<ResultHook<'_>>,
    ) -> Vec<TestResult> {
        let workers = self.settings.max_parallel.clamp(1, artifacts.len().max(1));
        let queue: Mutex<VecDeque<PathBuf>> =
            Mutex::new(artifacts.iter().cloned().collect());
        let (sender, receiver) = mpsc::channel();

        thread::scope(|scope| {
            for _ in 0..workers {
                let sender = sender.clone();
                let queue = &queue;
                scope.spawn(move || {
                    loop {
                        let next = match queue.lock() {
                            Ok(mut guard) => guard.pop_front(),
                            Err(_) => return,
                        };
                        let Some(artifact) = next else {
                            return;
                        };
                        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                            self.runner.run(&artifact, context, self.settings.timeout)
                        }))
                        .unwrap_or_else(|_| {
                            TestResult::errored(
                                &artifact.display().to_string(),
                                "worker panicked while running artifact",
                                Duration::ZERO,
                            )
                        });
                        if let Some(hook) = hook {
                            hook(&outcome);
                        }
                        if sender.send(outcome).is_err() {
                            return;
                        }
                    }
                });
            }
            drop(sender);
        });

        receiver.into_iter().collect()
    }
}
