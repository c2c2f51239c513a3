//! Workspace scan — walk the tree, parse every Go file, accumulate symbols.
//!
//! Dot-directories and dependency directories are pruned entirely (no
//! descent). Files are visited in lexical order, so the resulting sequence
//! is deterministic: file visit order, then declaration order within each
//! file.

use super::parser::SourceParser;
use super::types::Symbol;
use std::path::Path;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// Extension of indexed source files.
pub const SOURCE_EXTENSION: &str = "go";

/// Dependency directories that are never descended into.
const PRUNED_DIRS: &[&str] = &["node_modules", "vendor"];

/// Whether a directory entry below the root should be pruned. The root
/// itself is exempt: a workspace rooted at a dot-directory still indexes.
fn pruned(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || PRUNED_DIRS.contains(&name.as_ref())
}

fn is_source_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
}

/// Scan a workspace root and return every file-scope symbol found.
///
/// Unreadable and malformed files contribute zero symbols without aborting
/// the scan. A missing or empty root yields an empty index.
pub fn scan(root: &Path) -> Vec<Symbol> {
    info!("indexing symbols in {}", root.display());

    let mut parser = match SourceParser::new() {
        Ok(p) => p,
        Err(e) => {
            debug!("indexing disabled: {}", e);
            return Vec::new();
        }
    };

    let mut symbols = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !pruned(e));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        if !entry.file_type().is_file() || !is_source_path(entry.path()) {
            continue;
        }
        match parser.parse_file(entry.path()) {
            Some(syms) => symbols.extend(syms),
            None => debug!("skipping unparseable {}", entry.path().display()),
        }
    }

    info!("indexed {} symbols", symbols.len());
    symbols
}
