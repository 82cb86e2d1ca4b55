//! Bounded external process execution
//!
//! The installer and the scaffold invoker both shell out. Every child
//! inherits the terminal so its output streams live, runs under an optional
//! time limit, and is killed when the limit passes or the user hits Ctrl-C.

use async_trait::async_trait;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{NestkitError, ProcessFailure, Result};

/// One external command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable name or path
    pub program: String,
    /// Arguments
    pub args: Vec<String>,
    /// Working directory (None = current dir)
    pub working_dir: Option<PathBuf>,
    /// Time limit (None = wait forever)
    pub timeout: Option<Duration>,
}

impl Invocation {
    /// Create an invocation with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            timeout: None,
        }
    }

    /// Append arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set working directory
    #[must_use]
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Set time limit
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Whether `arg` is among the arguments
    #[must_use]
    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Runs external commands to completion
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `invocation` and succeed only on a zero exit status
    async fn run(&self, invocation: &Invocation) -> Result<()>;
}

/// Runs commands as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

enum Waited {
    Exited(io::Result<ExitStatus>),
    TimedOut,
    Interrupted,
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> Result<()> {
        let fail = |failure| NestkitError::Process {
            program: invocation.to_string(),
            failure,
        };

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = &invocation.working_dir {
            command.current_dir(dir);
        }

        debug!(command = %invocation, "Spawning process");
        let mut child = command
            .spawn()
            .map_err(|e| fail(ProcessFailure::Spawn(e)))?;

        let limit = invocation.timeout;
        let deadline = async move {
            match limit {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending::<()>().await,
            }
        };

        let waited = tokio::select! {
            status = child.wait() => Waited::Exited(status),
            () = deadline => Waited::TimedOut,
            Ok(()) = tokio::signal::ctrl_c() => Waited::Interrupted,
        };

        match waited {
            Waited::Exited(Ok(status)) if status.success() => {
                debug!(command = %invocation, "Process finished");
                Ok(())
            }
            Waited::Exited(Ok(status)) => {
                debug!(command = %invocation, %status, "Process failed");
                Err(fail(ProcessFailure::Exit(status)))
            }
            Waited::Exited(Err(e)) => Err(fail(ProcessFailure::Wait(e))),
            Waited::TimedOut => {
                let seconds = limit.map_or(0, |l| l.as_secs());
                warn!(command = %invocation, seconds, "Process timed out, killing it");
                child.kill().await.map_err(|e| fail(ProcessFailure::Wait(e)))?;
                Err(fail(ProcessFailure::Timeout { seconds }))
            }
            Waited::Interrupted => {
                warn!(command = %invocation, "Interrupted, killing process");
                child.kill().await.map_err(|e| fail(ProcessFailure::Wait(e)))?;
                Err(fail(ProcessFailure::Cancelled))
            }
        }
    }
}
