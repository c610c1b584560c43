//! Process invocation boundary
//!
//! Everything the core executes on the host (package managers, git, runtime
//! version probes) goes through [`CommandRunner`]. The production runner spawns
//! real processes with a bounded timeout; tests substitute a recording fake.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Timeout for short probes such as `node --version`
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// A single command line to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    /// Kept as OS strings so non-UTF-8 paths reach the child untouched
    pub args: Vec<OsString>,
    pub current_dir: Option<PathBuf>,
    pub timeout: Duration,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            timeout: PROBE_TIMEOUT,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    /// Human-readable command line, used in logs and error messages
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().map(|arg| arg.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was terminated by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Turn a non-zero exit into a [`ProcessError::Failed`]
    pub fn into_success(self, invocation: &Invocation) -> Result<Self, ProcessError> {
        if self.success() {
            Ok(self)
        } else {
            Err(ProcessError::Failed {
                command: invocation.command_line(),
                code: self.status.unwrap_or(-1),
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` timed out after {secs} seconds")]
    TimedOut { command: String, secs: u64 },

    #[error("`{command}` exited with code {code}: {stderr}")]
    Failed {
        command: String,
        code: i32,
        stderr: String,
    },
}

/// Executes invocations on behalf of the core
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion and capture output.
    ///
    /// A non-zero exit is not an error at this level; callers decide with
    /// [`CommandOutput::into_success`].
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, ProcessError>;
}

/// Runs invocations as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, ProcessError> {
        let command_line = invocation.command_line();
        debug!(command = %command_line, timeout_secs = invocation.timeout.as_secs(), "spawning process");

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &invocation.current_dir {
            command.current_dir(dir);
        }

        let child = command.spawn().map_err(|source| ProcessError::Spawn {
            command: command_line.clone(),
            source,
        })?;

        // Dropping the wait future on timeout kills the child (kill_on_drop)
        match timeout(invocation.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let output = CommandOutput {
                    status: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                };
                debug!(command = %command_line, status = ?output.status, "process finished");
                Ok(output)
            }
            Ok(Err(source)) => Err(ProcessError::Spawn {
                command: command_line,
                source,
            }),
            Err(_) => Err(ProcessError::TimedOut {
                command: command_line,
                secs: invocation.timeout.as_secs(),
            }),
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::sync::Mutex;

    type Handler = dyn Fn(&Invocation) -> Result<CommandOutput, ProcessError> + Send + Sync;

    /// Runner that answers from a closure and records every invocation
    pub(crate) struct FakeRunner {
        handler: Box<Handler>,
        calls: Mutex<Vec<Invocation>>,
    }

    impl FakeRunner {
        pub(crate) fn new<F>(handler: F) -> Self
        where
            F: Fn(&Invocation) -> Result<CommandOutput, ProcessError> + Send + Sync + 'static,
        {
            Self {
                handler: Box::new(handler),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn calls(&self) -> Vec<Invocation> {
            self.calls.lock().unwrap().clone()
        }

        pub(crate) fn calls_to(&self, program: &str) -> Vec<Invocation> {
            self.calls()
                .into_iter()
                .filter(|call| call.program == program)
                .collect()
        }
    }

    #[async_trait]
    impl CommandRunner for FakeRunner {
        async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, ProcessError> {
            self.calls.lock().unwrap().push(invocation.clone());
            (self.handler)(invocation)
        }
    }

    pub(crate) fn ok(stdout: &str) -> Result<CommandOutput, ProcessError> {
        Ok(CommandOutput {
            status: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        })
    }

    pub(crate) fn exit(code: i32, stderr: &str) -> Result<CommandOutput, ProcessError> {
        Ok(CommandOutput {
            status: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        })
    }

    pub(crate) fn not_found(invocation: &Invocation) -> Result<CommandOutput, ProcessError> {
        Err(ProcessError::Spawn {
            command: invocation.command_line(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        })
    }
}
