// src/feed/mod.rs

//! Change detection: where candidate paths come from.
//!
//! Two interchangeable strategies produce batches of candidate paths:
//! - [`PollFeed`] rescans the tree every interval (portable),
//! - [`EventFeed`] forwards native notifications from `notify` (low latency).
//!
//! [`ChangeFeed`] hides the choice from the monitor, which treats every
//! batch the same way. Feeds know nothing about assets or staleness.

pub mod event;
pub mod poll;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::config::PathMatcher;
use crate::errors::{MashError, Result};
use crate::fs::FileSystem;
use crate::types::FeedMode;

pub use event::EventFeed;
pub use poll::{DEFAULT_POLL_INTERVAL, PollFeed, scan_tree};

/// The strategy selected at startup.
#[derive(Debug)]
pub enum ChangeFeed {
    Poll(PollFeed),
    Event(EventFeed),
}

impl ChangeFeed {
    pub fn poll(
        root: impl Into<PathBuf>,
        matcher: Arc<PathMatcher>,
        fs: Arc<dyn FileSystem>,
        interval: Duration,
    ) -> Self {
        ChangeFeed::Poll(PollFeed::new(root, matcher, fs, interval))
    }

    /// Pick a strategy for `mode`.
    ///
    /// `Auto` prefers native notifications and falls back to polling when
    /// the watcher cannot be created; `Event` treats that as an error.
    pub fn select(
        mode: FeedMode,
        root: impl Into<PathBuf>,
        matcher: Arc<PathMatcher>,
        fs: Arc<dyn FileSystem>,
        interval: Duration,
    ) -> Result<Self> {
        let root = root.into();
        match mode {
            FeedMode::Poll => Ok(Self::poll(root, matcher, fs, interval)),
            FeedMode::Event => EventFeed::spawn(root, matcher, fs)
                .map(ChangeFeed::Event)
                .map_err(|e| {
                    MashError::ConfigError(format!(
                        "native filesystem notifications unavailable: {e:#}"
                    ))
                }),
            FeedMode::Auto => {
                match EventFeed::spawn(root.clone(), Arc::clone(&matcher), Arc::clone(&fs)) {
                    Ok(feed) => Ok(ChangeFeed::Event(feed)),
                    Err(err) => {
                        warn!(error = %err, "native filesystem notifications unavailable; polling instead");
                        Ok(Self::poll(root, matcher, fs, interval))
                    }
                }
            }
        }
    }

    /// The strategy in use (`Poll` or `Event`).
    pub fn mode(&self) -> FeedMode {
        match self {
            ChangeFeed::Poll(_) => FeedMode::Poll,
            ChangeFeed::Event(_) => FeedMode::Event,
        }
    }

    /// Next batch of candidate paths, or `None` when the feed has ended.
    pub async fn next_batch(&mut self) -> Option<Vec<PathBuf>> {
        match self {
            ChangeFeed::Poll(feed) => Some(feed.next_batch().await),
            ChangeFeed::Event(feed) => feed.next_batch().await,
        }
    }
}
