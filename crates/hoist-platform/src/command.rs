use std::ffi::OsStr;
use std::process::{Command as StdCommand, Output};

use tracing::debug;

use crate::error::{Error, Result};

/// A child process run to completion.
#[derive(Debug)]
pub struct Command {
    inner: StdCommand,
    program: String,
}

impl Command {
    pub fn new(program: impl Into<String>) -> Self {
        let program = program.into();
        Self {
            inner: StdCommand::new(&program),
            program,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.inner.arg(arg);
        self
    }

    /// Run and collect the output, whatever the exit status.
    pub fn capture(mut self) -> Result<Output> {
        debug!(cmd = %self.program, "running");
        self.inner.output().map_err(|e| Error::CommandFailed {
            cmd: self.program.clone(),
            source: e,
        })
    }

    /// Run and fail unless the process exits successfully.
    pub fn run(self) -> Result<Output> {
        let program = self.program.clone();
        let output = self.capture()?;
        if output.status.success() {
            Ok(output)
        } else {
            Err(Error::CommandStatus {
                cmd: program,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}
