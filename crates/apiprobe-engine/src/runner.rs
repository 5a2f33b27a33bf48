// crates/apiprobe-engine/src/runner.rs
// ============================================================================
// Module: Artifact Runner
// Description: Single-artifact execution via the external runner binary.
// Purpose: Run one rendered artifact with timeout and output capture.
// Dependencies: apiprobe-core, std::process
// ============================================================================

//! ## Overview
//! The runner wraps the external shell-test binary (bats by default). A
//! probe invocation checks availability once before any artifact runs;
//! each run pipes output through reader threads, polls the child for
//! completion, and kills it at the deadline. Every run yields exactly one
//! [`TestResult`] terminal state: completed processes map to Passed or
//! Failed by exit code, deadline hits map to TimedOut, and spawn or wait
//! failures map to Errored.
//! Invariants:
//! - Success is solely determined by a zero external exit code.
//! - A timed-out run is killed and reaped before the result is recorded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::path::Path;
use std::process::Child;
use std::process::Command;
use std::process::ExitStatus;
use std::process::Stdio;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use apiprobe_core::TestResult;

use crate::context::ExecutionContext;
use crate::engine::ExecError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default external runner binary.
pub const DEFAULT_RUNNER: &str = "bats";

/// Interval between child-completion polls.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

// ============================================================================
// SECTION: Runner Command
// ============================================================================

/// External runner binary used to execute one artifact at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerCommand {
    /// Program name or path of the runner binary.
    program: String,
}

impl Default for RunnerCommand {
    fn default() -> Self {
        Self::new(DEFAULT_RUNNER)
    }
}

impl RunnerCommand {
    /// Creates a runner over the given program.
    #[must_use]
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }

    /// Returns the runner program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Probes the runner binary once before any artifact runs.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::RunnerUnavailable`] when the binary cannot be
    /// invoked or its version probe fails.
    pub fn probe(&self) -> Result<(), ExecError> {
        let status = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match status {
            Ok(status) if status.success() => Ok(()),
            _ => Err(ExecError::RunnerUnavailable(self.program.clone())),
        }
    }

    /// Runs one artifact, bounded by the timeout.
    ///
    /// The artifact's parent directory becomes the working directory so
    /// relative helper lookups inside the artifact resolve.
    #[must_use]
    pub fn run(
        &self,
        artifact: &Path,
        context: &ExecutionContext,
        timeout: Duration,
    ) -> TestResult {
        let resolved = artifact.canonicalize().unwrap_or_else(|_| artifact.to_path_buf());
        let label = artifact.display().to_string();
        let mut command = Command::new(&self.program);
        command.arg(&resolved).envs(context.env_vars());
        if let Some(parent) = resolved.parent() {
            command.current_dir(parent);
        }
        run_process(&label, &mut command, timeout)
    }
}

// ============================================================================
// SECTION: Process Execution
// ============================================================================

/// Runs a prepared command to a terminal [`TestResult`] state.
pub(crate) fn run_process(label: &str, command: &mut Command, timeout: Duration) -> TestResult {
    let started = Instant::now();
    command.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(err) => {
            return TestResult::errored(
                label,
                &format!("failed to spawn runner: {err}"),
                started.elapsed(),
            );
        }
    };

    let stdout = child.stdout.take().map(spawn_reader);
    let stderr = child.stderr.take().map(spawn_reader);

    match wait_with_deadline(&mut child, timeout) {
        Ok(Some(status)) => TestResult::completed(
            label,
            exit_code(status),
            join_reader(stdout),
            join_reader(stderr),
            started.elapsed(),
        ),
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait();
            let _ = join_reader(stdout);
            let _ = join_reader(stderr);
            TestResult::timed_out(label, timeout, started.elapsed())
        }
        Err(err) => {
            let _ = child.kill();
            let _ = child.wait();
            TestResult::errored(label, &format!("wait failed: {err}"), started.elapsed())
        }
    }
}

/// Polls a child until it exits or the deadline passes.
fn wait_with_deadline(
    child: &mut Child,
    timeout: Duration,
) -> std::io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Maps an exit status to a numeric code, treating signal deaths as 1.
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

/// Drains one output stream on a reader thread.
fn spawn_reader<R: Read + Send + 'static>(stream: R) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut reader = stream;
        let mut bytes = Vec::new();
        let _ = reader.read_to_end(&mut bytes);
        String::from_utf8_lossy(&bytes).into_owned()
    })
}

/// Joins a reader thread, tolerating missing or panicked readers.
fn join_reader(handle: Option<thread::JoinHandle<String>>) -> String {
    handle.and_then(|handle| handle.join().ok()).unwrap_or_default()
}
