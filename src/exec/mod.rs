//! Subprocess invocation — combined capture and environment overlay.
//!
//! Captured output is a single byte stream: one pipe, its writer duplicated
//! into the child's stdout and stderr, so the two are interleaved in the
//! order the subprocess produced them. No timeout: a hung child blocks its
//! caller until it exits.

pub mod runner;

use std::collections::HashMap;
use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};

/// Raw outcome of a subprocess invocation.
#[derive(Debug)]
pub struct ExecOutput {
    /// Interleaved stdout + stderr, undecoded.
    pub bytes: Vec<u8>,
    pub status: ExitStatus,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Overlay non-empty override pairs onto the inherited environment. Empty
/// values are ignored, not used to unset a variable.
pub fn apply_env(cmd: &mut Command, overrides: &HashMap<String, String>) {
    for (key, value) in overrides {
        if !value.is_empty() {
            cmd.env(key, value);
        }
    }
}

/// Run a command to completion, capturing stdout and stderr as one
/// interleaved stream.
pub fn run_combined(mut cmd: Command) -> Result<ExecOutput, String> {
    let (mut reader, stdout_writer) =
        os_pipe::pipe().map_err(|e| format!("cannot create pipe: {}", e))?;
    let stderr_writer = stdout_writer
        .try_clone()
        .map_err(|e| format!("cannot clone pipe: {}", e))?;

    cmd.stdin(Stdio::null())
        .stdout(stdout_writer)
        .stderr(stderr_writer);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            return Err(format!(
                "failed to execute '{}': {}",
                cmd.get_program().to_string_lossy(),
                e
            ));
        }
    };

    // The Command still holds both writer ends; drop it so the reader sees
    // EOF once the child (and anything inheriting the pipe) exits.
    drop(cmd);

    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| format!("read error: {}", e))?;
    let status = child.wait().map_err(|e| format!("wait error: {}", e))?;

    Ok(ExecOutput { bytes, status })
}
