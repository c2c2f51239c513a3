//! Toolchain location — find a usable `go` binary.
//!
//! Always returns *some* path: an explicit override wins unconditionally,
//! then portable layouts under the working directory, then PATH, then the
//! bare name as a last resort. A missing toolchain is only discovered when
//! execution is attempted.

use crate::platform;
use std::path::{Path, PathBuf};

/// Toolchain executable name.
pub const TOOLCHAIN: &str = "go";

/// Environment key carrying an explicit toolchain-root override.
pub const TOOLCHAIN_ROOT_VAR: &str = "GOROOT";

/// Locate the toolchain binary. An explicit root override returns
/// `<root>/bin/go` without an existence check; a bad override surfaces as
/// an execution failure, not a location failure.
pub fn locate(toolchain_root: Option<&str>) -> PathBuf {
    if let Some(root) = toolchain_root {
        if !root.is_empty() {
            return Path::new(root).join("bin").join(TOOLCHAIN);
        }
    }
    match std::env::current_dir() {
        Ok(cwd) => locate_from(&cwd),
        Err(_) => PathBuf::from(TOOLCHAIN),
    }
}

/// Probe portable layouts under `cwd`, then PATH, then fall back to the
/// bare name.
fn locate_from(cwd: &Path) -> PathBuf {
    // An unpacked distribution directly in the working directory.
    if let Some(found) = existing_binary(cwd.join(TOOLCHAIN).join("bin").join(TOOLCHAIN)) {
        return found;
    }

    // One level deep, for unzipped folders: <sub>/go/bin/go, then <sub>
    // itself as the toolchain root. Lexical order keeps probing
    // deterministic.
    let mut subdirs: Vec<PathBuf> = std::fs::read_dir(cwd)
        .map(|entries| {
            entries
                .flatten()
                .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
                .map(|e| e.path())
                .collect()
        })
        .unwrap_or_default();
    subdirs.sort();

    for sub in subdirs {
        if let Some(found) = existing_binary(sub.join(TOOLCHAIN).join("bin").join(TOOLCHAIN)) {
            return found;
        }
        if let Some(found) = existing_binary(sub.join("bin").join(TOOLCHAIN)) {
            return found;
        }
    }

    if let Some(found) = search_path(TOOLCHAIN) {
        return found;
    }

    PathBuf::from(TOOLCHAIN)
}

/// The candidate, platform-suffixed, if it exists and is not a directory.
fn existing_binary(candidate: PathBuf) -> Option<PathBuf> {
    let candidate = platform::exe_candidate(candidate);
    match std::fs::metadata(&candidate) {
        Ok(meta) if !meta.is_dir() => Some(candidate),
        _ => None,
    }
}

/// Search the process's executable search path for a bare name.
fn search_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path_var) {
        if dir.as_os_str().is_empty() {
            continue;
        }
        if let Some(found) = existing_binary(dir.join(name)) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    #[test]
    fn test_override_wins_without_existence_check() {
        let got = locate(Some("/definitely/not/real"));
        assert_eq!(got, Path::new("/definitely/not/real").join("bin").join("go"));
    }

    #[test]
    fn test_empty_override_ignored() {
        // Falls through to probing; must still return something.
        let got = locate(Some(""));
        assert!(!got.as_os_str().is_empty());
    }

    #[test]
    fn test_local_distribution_preferred() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("go/bin/go"));
        touch(&dir.path().join("aaa/bin/go"));

        assert_eq!(locate_from(dir.path()), dir.path().join("go/bin/go"));
    }

    #[test]
    fn test_subdirectory_probes_in_lexical_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("bbb/go/bin/go"));
        touch(&dir.path().join("aaa/bin/go"));

        assert_eq!(locate_from(dir.path()), dir.path().join("aaa/bin/go"));
    }

    #[test]
    fn test_subdirectory_nested_layout_before_flat() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("dist/go/bin/go"));
        touch(&dir.path().join("dist/bin/go"));

        assert_eq!(locate_from(dir.path()), dir.path().join("dist/go/bin/go"));
    }

    #[test]
    fn test_fallback_always_names_the_toolchain() {
        // Nothing local: result is a PATH hit or the bare name, but in
        // every case the file name is the toolchain executable.
        let dir = tempfile::tempdir().unwrap();
        let got = locate_from(dir.path());
        let name = got.file_stem().unwrap();
        assert_eq!(name, "go");
    }

    #[test]
    fn test_search_path_miss_is_none() {
        assert!(search_path("gopad-no-such-binary-xyz").is_none());
    }

    #[test]
    fn test_candidate_must_not_be_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("go/bin/go")).unwrap();
        assert!(existing_binary(dir.path().join("go/bin/go")).is_none());
    }
}
