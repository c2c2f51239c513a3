//! Import-specifier resolution.
//!
//! Maps the textual path inside an import statement to a concrete file on
//! disk. Three tiers, first hit wins: relative to the importing file,
//! alias-prefixed against the workspace root, then bare specifiers probed
//! next to the file and under the root. A heuristic, not full module
//! resolution: no manifest or build-configuration files are consulted.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Alias prefix that anchors a specifier at the workspace root.
const ALIAS_PREFIX: &str = "@/";

/// Suffixes probed against each candidate, in order: as-is, each recognized
/// source extension, then the per-extension index file convention.
const PROBE_SUFFIXES: &[&str] = &[
    "",
    ".go",
    ".ts",
    ".tsx",
    ".js",
    ".jsx",
    ".json",
    "/index.go",
    "/index.ts",
    "/index.tsx",
    "/index.js",
];

/// Resolve an import specifier against the file that contains it.
///
/// Returns the first existing, non-directory match, or None when every
/// applicable tier misses. An alias specifier with no workspace root set is
/// a miss, not a fall-through to another tier.
pub fn resolve(base: &Path, specifier: &str, workspace_root: Option<&Path>) -> Option<PathBuf> {
    let dir = base.parent().unwrap_or_else(|| Path::new("."));

    if specifier.starts_with('.') {
        return probe(&dir.join(specifier));
    }

    if let Some(rest) = specifier.strip_prefix(ALIAS_PREFIX) {
        let root = workspace_root?;
        return probe(&root.join(rest)).or_else(|| probe(&root.join("src").join(rest)));
    }

    probe(&dir.join(specifier))
        .or_else(|| workspace_root.and_then(|root| probe(&root.join(specifier))))
}

/// Probe the suffix list against a candidate stem; first existing
/// non-directory file wins.
fn probe(stem: &Path) -> Option<PathBuf> {
    for suffix in PROBE_SUFFIXES {
        let mut candidate = OsString::from(stem.as_os_str());
        candidate.push(suffix);
        let candidate = PathBuf::from(candidate);
        if std::fs::metadata(&candidate).is_ok_and(|m| !m.is_dir()) {
            return Some(candidate);
        }
    }
    None
}
