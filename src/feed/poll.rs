// src/feed/poll.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, warn};

use crate::config::PathMatcher;
use crate::fs::FileSystem;

/// Delay between two full scans of the tree.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Rescans the whole project tree once per interval.
///
/// Cost is proportional to the size of the tree on every cycle; latency is
/// at most one interval.
#[derive(Debug)]
pub struct PollFeed {
    root: PathBuf,
    matcher: Arc<PathMatcher>,
    fs: Arc<dyn FileSystem>,
    interval: Duration,
    primed: bool,
}

impl PollFeed {
    pub fn new(
        root: impl Into<PathBuf>,
        matcher: Arc<PathMatcher>,
        fs: Arc<dyn FileSystem>,
        interval: Duration,
    ) -> Self {
        Self {
            root: root.into(),
            matcher,
            fs,
            interval,
            primed: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Files in monitored directories. The first call returns immediately;
    /// later calls sleep for one interval before scanning.
    pub async fn next_batch(&mut self) -> Vec<PathBuf> {
        if self.primed {
            tokio::time::sleep(self.interval).await;
        }
        self.primed = true;

        let fs = Arc::clone(&self.fs);
        let root = self.root.clone();
        let matcher = Arc::clone(&self.matcher);

        match tokio::task::spawn_blocking(move || scan_tree(fs.as_ref(), &root, &matcher)).await {
            Ok(Ok(files)) => files,
            Ok(Err(err)) => {
                warn!(error = %err, "scanning project tree failed; retrying next cycle");
                Vec::new()
            }
            Err(err) => {
                warn!(error = %err, "scan task did not complete; retrying next cycle");
                Vec::new()
            }
        }
    }
}

/// Walk `root` and return every file whose directory is monitored.
///
/// The root itself is a candidate directory too. Symlinked directories are
/// not followed. Subdirectories that disappear mid-walk are skipped; only an
/// unreadable root is an error. The result is sorted.
pub fn scan_tree(fs: &dyn FileSystem, root: &Path, matcher: &PathMatcher) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = match fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if dir.as_path() != root => {
                debug!(?dir, error = %err, "skipping unreadable directory");
                continue;
            }
            Err(err) => return Err(err),
        };

        let monitored = matcher.matches(&dir);
        for path in entries {
            if fs.is_dir(&path) {
                if !fs.is_symlink(&path) {
                    stack.push(path);
                }
            } else if monitored && fs.is_file(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}
