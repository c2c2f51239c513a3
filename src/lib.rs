//! gopad — the backend of a local, browser-rendered Go editor.
//!
//! Indexes a workspace's file-scope declarations, resolves import-style
//! specifiers to files on disk, locates a usable `go` binary across
//! bundled, workspace-local, and system-wide locations, and runs code
//! through it with captured, platform-normalized output.

pub mod cli;
pub mod core;
pub mod exec;
pub mod platform;
