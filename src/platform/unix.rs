//! Unix capability implementation.

use std::path::PathBuf;
use std::process::Command;

/// Executable candidate path — no suffix convention on unix.
pub fn exe_candidate(path: PathBuf) -> PathBuf {
    path
}

/// Decode captured subprocess output. Unix toolchains emit UTF-8; invalid
/// sequences are replaced rather than failing the run.
pub fn decode_output(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Shell fallback for bare commands. Unix executes programs directly, so
/// there is never a reason to hand the line to an interpreter.
pub fn shell_command(_line: &str, _program: &str) -> Option<Command> {
    None
}
