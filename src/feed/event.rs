// src/feed/event.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::PathMatcher;
use crate::fs::FileSystem;
use crate::path_utils::rebase_onto_root;

use super::poll::PollFeed;

/// Native filesystem notifications for the whole project tree.
///
/// The first batch is a full scan so assets that went stale while nothing
/// was watching are caught; after that each batch holds the paths reported
/// since the previous one. The same path may still show up in consecutive
/// batches, which the monitor tolerates.
pub struct EventFeed {
    root: PathBuf,
    rx: mpsc::UnboundedReceiver<PathBuf>,
    sweep: Option<PollFeed>,
    // Dropping the watcher stops notifications.
    _watcher: RecommendedWatcher,
}

impl std::fmt::Debug for EventFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventFeed")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl EventFeed {
    /// Register one recursive watch on `root`.
    ///
    /// Fails if the platform has no usable notification backend or the root
    /// cannot be watched.
    pub fn spawn(
        root: impl Into<PathBuf>,
        matcher: Arc<PathMatcher>,
        fs: Arc<dyn FileSystem>,
    ) -> Result<Self> {
        let root = root.into();
        let (tx, rx) = mpsc::unbounded_channel::<PathBuf>();

        // Called synchronously on the watcher's own thread.
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if !is_content_change(&event.kind) {
                        return;
                    }
                    for path in event.paths {
                        if tx.send(path).is_err() {
                            // Feed dropped; nothing left to notify.
                            return;
                        }
                    }
                }
                Err(err) => warn!("file watch error: {err}"),
            },
            Config::default(),
        )?;

        watcher.watch(&root, RecursiveMode::Recursive)?;
        info!("file watcher started on {:?}", root);

        let sweep = PollFeed::new(root.clone(), matcher, fs, super::DEFAULT_POLL_INTERVAL);

        Ok(Self {
            root,
            rx,
            sweep: Some(sweep),
            _watcher: watcher,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Wait for the next paths to look at.
    ///
    /// Returns `None` once the watcher has shut down.
    pub async fn next_batch(&mut self) -> Option<Vec<PathBuf>> {
        if let Some(mut sweep) = self.sweep.take() {
            return Some(sweep.next_batch().await);
        }

        let first = self.rx.recv().await?;
        let mut seen = HashSet::new();
        let mut batch = Vec::new();

        let mut pending = Some(first);
        while let Some(path) = pending {
            match rebase_onto_root(&self.root, &path) {
                Some(path) => {
                    if seen.insert(path.clone()) {
                        batch.push(path);
                    }
                }
                None => debug!(?path, "event path outside project root; ignoring"),
            }
            pending = self.rx.try_recv().ok();
        }

        Some(batch)
    }
}

fn is_content_change(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}
