//! Core data model — symbols, run jobs, run results.
//!
//! Everything here is plain data: the transport layer above serializes these
//! types directly, and nothing in them is mutated after construction.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Kind of a file-scope declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolKind {
    /// Free function.
    Function,
    /// Function with a receiver.
    Method,
    /// Type declaration (struct, interface, alias; all reported as Struct).
    Struct,
    /// `var` declaration.
    Variable,
    /// `const` declaration.
    Constant,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SymbolKind::Function => "Function",
            SymbolKind::Method => "Method",
            SymbolKind::Struct => "Struct",
            SymbolKind::Variable => "Variable",
            SymbolKind::Constant => "Constant",
        };
        write!(f, "{}", s)
    }
}

/// One declared name found by parsing a source file.
///
/// Immutable once created: symbols are only ever replaced as part of a full
/// index rebuild, never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// Identifier text.
    pub name: String,

    /// Declaration kind.
    pub kind: SymbolKind,

    /// Source file the declaration lives in.
    pub path: PathBuf,

    /// 1-based line of the name token.
    pub line: usize,

    /// 1-based column of the name token.
    pub column: usize,
}

/// An ephemeral execution request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunJob {
    /// Source text to run.
    pub code: String,

    /// Target file to write and run. When absent a scratch file is used and
    /// removed again on completion.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Environment overrides (GOROOT, GOPATH, GOPROXY, ...). Empty values
    /// are ignored, not used to unset.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

/// Captured outcome of a run. Output is stdout and stderr interleaved in the
/// order the subprocess produced them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunResult {
    /// Combined, platform-normalized output text.
    pub output: String,

    /// Failure description, if the toolchain could not be launched or exited
    /// non-zero. Partial output is still reported alongside.
    #[serde(default)]
    pub error: Option<String>,
}

/// Toolchain environment report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvReport {
    /// Output of `go version`, or a failure description.
    pub toolchain_version: String,

    /// Host operating system.
    pub host_os: String,

    /// Host CPU architecture.
    pub host_arch: String,

    /// Output of `go env`, or a failure description.
    pub env_vars: String,
}
