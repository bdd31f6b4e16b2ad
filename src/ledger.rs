// src/ledger.rs

//! Record of assets whose last minification failed.
//!
//! The records live in memory for one monitoring run. Every mutation
//! rewrites `<root>/MASH_ERRORS` (one absolute path per line) so editors and
//! scripts can see what is currently broken; the file is removed as soon as
//! nothing is failing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::fs::FileSystem;

/// Name of the sidecar file, relative to the project root.
pub const ERROR_LEDGER_FILE: &str = "MASH_ERRORS";

/// Failed assets and the time of their most recent failure.
#[derive(Debug)]
pub struct ErrorLedger {
    sidecar: PathBuf,
    fs: Arc<dyn FileSystem>,
    records: BTreeMap<PathBuf, SystemTime>,
}

impl ErrorLedger {
    /// Create an empty ledger without touching the filesystem.
    pub fn new(root: &Path, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            sidecar: root.join(ERROR_LEDGER_FILE),
            fs,
            records: BTreeMap::new(),
        }
    }

    /// Create an empty ledger for a new run.
    ///
    /// A sidecar left behind by an earlier process is removed: records are
    /// never recovered across restarts.
    pub fn open(root: &Path, fs: Arc<dyn FileSystem>) -> Result<Self> {
        let ledger = Self::new(root, fs);
        if ledger.fs.exists(&ledger.sidecar) {
            info!("removing stale {:?} from a previous run", ledger.sidecar);
            ledger.fs.remove_file(&ledger.sidecar)?;
        }
        Ok(ledger)
    }

    pub fn sidecar_path(&self) -> &Path {
        &self.sidecar
    }

    /// Record a failure at the current time and rewrite the sidecar.
    pub fn record_failure(&mut self, path: &Path) -> Result<()> {
        self.record_failure_at(path, SystemTime::now())
    }

    /// Record a failure at an explicit time and rewrite the sidecar.
    pub fn record_failure_at(&mut self, path: &Path, at: SystemTime) -> Result<()> {
        self.records.insert(path.to_path_buf(), at);
        debug!(?path, failing = self.records.len(), "recorded failure");
        self.persist()
    }

    /// Forget any failure for `path` and rewrite the sidecar.
    pub fn record_success(&mut self, path: &Path) -> Result<()> {
        if self.records.remove(path).is_some() {
            debug!(?path, failing = self.records.len(), "cleared failure");
        }
        self.persist()
    }

    /// Time of the most recent failure for `path`, if it is failing.
    pub fn failed_at(&self, path: &Path) -> Option<SystemTime> {
        self.records.get(path).copied()
    }

    pub fn snapshot(&self) -> BTreeMap<PathBuf, SystemTime> {
        self.records.clone()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sidecar contents for the current records.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for path in self.records.keys() {
            out.push_str(&path.to_string_lossy());
            out.push('\n');
        }
        out
    }

    /// Replace the sidecar with the current records, or delete it when empty.
    pub fn persist(&self) -> Result<()> {
        if self.records.is_empty() {
            if self.fs.exists(&self.sidecar) {
                self.fs
                    .remove_file(&self.sidecar)
                    .with_context(|| format!("removing error ledger {:?}", self.sidecar))?;
            }
            return Ok(());
        }

        self.fs
            .write(&self.sidecar, self.render().as_bytes())
            .with_context(|| format!("writing error ledger {:?}", self.sidecar))
    }
}
