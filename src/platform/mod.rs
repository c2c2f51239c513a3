//! Platform capabilities — the few places behavior differs per host.
//!
//! One implementation per target, selected at compile time. Everything else
//! in the crate is platform-neutral and goes through these three functions:
//! executable naming, captured-output decoding, and the shell fallback for
//! bare commands.

#[cfg(not(windows))]
mod unix;
#[cfg(not(windows))]
pub use unix::{decode_output, exe_candidate, shell_command};

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::{decode_output, exe_candidate, shell_command};
