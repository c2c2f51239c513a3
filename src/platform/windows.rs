//! Windows capability implementation.

use std::path::PathBuf;
use std::process::Command;

/// Executable candidate path — append the `.exe` suffix before probing.
pub fn exe_candidate(mut path: PathBuf) -> PathBuf {
    if path.extension().is_none() {
        path.set_extension("exe");
    }
    path
}

/// Decode captured subprocess output. Console programs (cmd /C in
/// particular) often emit the legacy GBK code page; fall back to lossy UTF-8
/// when the bytes don't decode cleanly.
pub fn decode_output(bytes: &[u8]) -> String {
    let (decoded, _, had_errors) = encoding_rs::GBK.decode(bytes);
    if had_errors {
        String::from_utf8_lossy(bytes).into_owned()
    } else {
        decoded.into_owned()
    }
}

/// Bare program names can't use shell metacharacters on windows; hand the
/// whole line to the command interpreter verbatim. Programs given by path
/// are executed directly.
pub fn shell_command(line: &str, program: &str) -> Option<Command> {
    if program.contains('\\') || program.contains('/') {
        return None;
    }
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(line);
    Some(cmd)
}
