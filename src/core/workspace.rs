//! Workspace service — the single active root and the published symbol
//! snapshot.
//!
//! The snapshot is an atomically-swapped immutable handle: readers always
//! see either the previous or the next complete index, never a partial one.
//! Rebuilds are scheduled fire-and-forget; each takes a generation stamp at
//! schedule time and a rebuild that finishes after a newer one was scheduled
//! is discarded rather than published.

use super::config::{self, EditorConfig};
use super::index::{self, SOURCE_EXTENSION};
use super::types::Symbol;
use arc_swap::ArcSwap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Owns the active workspace root and the process-wide symbol index.
pub struct Workspace {
    root: RwLock<Option<PathBuf>>,
    index: ArcSwap<Vec<Symbol>>,
    generation: AtomicU64,
    /// Where to persist the active root; None disables persistence.
    config_path: Option<PathBuf>,
}

impl Workspace {
    /// A workspace with no active root and an empty index.
    pub fn new() -> Self {
        Workspace {
            root: RwLock::new(None),
            index: ArcSwap::from_pointee(Vec::new()),
            generation: AtomicU64::new(0),
            config_path: None,
        }
    }

    /// Persist root changes to the given config file.
    pub fn with_config(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Restore the last active workspace from config, falling back to the
    /// process's working directory when nothing usable was remembered.
    pub fn restore(config_path: &Path) -> Self {
        let root = config::restore_workspace(config_path)
            .or_else(|| std::env::current_dir().ok());
        let ws = Workspace::new().with_config(config_path.to_path_buf());
        *ws.root.write().unwrap_or_else(|e| e.into_inner()) = root;
        ws
    }

    /// Schedule the initial rebuild for a restored workspace. Called once
    /// at process start when a root is known.
    pub fn start(self: &Arc<Self>) {
        if self.root().is_some() {
            self.schedule_rebuild();
        }
    }

    /// The active workspace root, if any.
    pub fn root(&self) -> Option<PathBuf> {
        self.root.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Change the active workspace. Validates the path, persists it
    /// best-effort, and schedules a rebuild. Not synchronized against
    /// in-flight rebuilds or runs.
    pub fn set_root(self: &Arc<Self>, path: &Path) -> Result<(), String> {
        let meta = std::fs::metadata(path)
            .map_err(|e| format!("path does not exist: {}: {}", path.display(), e))?;
        if !meta.is_dir() {
            return Err(format!("path is not a directory: {}", path.display()));
        }

        *self.root.write().unwrap_or_else(|e| e.into_inner()) = Some(path.to_path_buf());

        if let Some(ref cfg_path) = self.config_path {
            let cfg = EditorConfig {
                last_workspace: Some(path.to_path_buf()),
            };
            if let Err(e) = config::save(cfg_path, &cfg) {
                debug!("config save failed: {}", e);
            }
        }

        self.schedule_rebuild();
        Ok(())
    }

    /// Non-blocking read of the current published snapshot. Never triggers
    /// a rebuild.
    pub fn symbols(&self) -> Arc<Vec<Symbol>> {
        self.index.load_full()
    }

    /// Rebuild synchronously: scan the active root and publish.
    pub fn rebuild(&self) {
        let stamp = self.next_generation();
        self.rebuild_stamped(stamp);
    }

    /// Schedule a rebuild on a background thread, not awaited. Concurrent
    /// triggers race; the stamp taken here decides which result publishes.
    pub fn schedule_rebuild(self: &Arc<Self>) {
        let stamp = self.next_generation();
        let ws = Arc::clone(self);
        std::thread::spawn(move || ws.rebuild_stamped(stamp));
    }

    /// Re-index trigger for a saved or executed source file. Only fires for
    /// indexed source files while a workspace is active.
    pub fn file_saved(self: &Arc<Self>, path: &Path) {
        let is_source = path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION);
        if is_source && self.root().is_some() {
            self.schedule_rebuild();
        }
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn rebuild_stamped(&self, stamp: u64) {
        let Some(root) = self.root() else {
            return;
        };
        let symbols = index::scan(&root);
        // A newer rebuild was scheduled while this one scanned: discard.
        if self.generation.load(Ordering::SeqCst) == stamp {
            self.index.store(Arc::new(symbols));
        } else {
            debug!("discarding stale index rebuild (generation {})", stamp);
        }
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Workspace::new()
    }
}
