// src/monitor/mod.rs

//! The monitoring pipeline.
//!
//! For every candidate path, strictly one at a time:
//!
//! 1. parent directory must be monitored (`PathMatcher`),
//! 2. path must still be a regular file,
//! 3. file must be a source asset (`asset`),
//! 4. asset must be stale (`staleness`),
//! 5. minify it (`Transformer`),
//! 6. record the result in the `ErrorLedger`.
//!
//! Rechecking freshness is cheap and side-effect free, so duplicate or
//! reordered candidates from the event feed are harmless.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::asset::SourceAsset;
use crate::config::{MonitorConfiguration, PathMatcher};
use crate::errors::{MashError, Result};
use crate::feed::ChangeFeed;
use crate::fs::FileSystem;
use crate::ledger::ErrorLedger;
use crate::staleness::{Staleness, check_staleness};
use crate::transform::Transformer;

/// What happened to one candidate path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateOutcome {
    /// Its directory is not matched by any pattern.
    Unmonitored,
    /// Not a regular file any more (removed, or a directory).
    Missing,
    /// Not a script/stylesheet, hidden, or already minified.
    NotAnAsset,
    /// The artifact is newer than the source.
    Fresh,
    /// Failed earlier and unchanged since.
    Suppressed,
    /// Minified; holds the artifact path.
    Transformed(PathBuf),
    /// The compressor reported an error; holds its message.
    Failed(String),
}

/// Summary of one batch of candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub transformed: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
    pub skipped: usize,
}

impl CycleReport {
    fn record(&mut self, path: &Path, outcome: &CandidateOutcome) {
        match outcome {
            CandidateOutcome::Transformed(_) => self.transformed.push(path.to_path_buf()),
            CandidateOutcome::Failed(_) => self.failed.push(path.to_path_buf()),
            _ => self.skipped += 1,
        }
    }
}

/// Options for [`Monitor::run`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MonitorOptions {
    /// Stop after the first batch (used for `--once`).
    pub exit_after_first_batch: bool,
}

/// Single worker owning the ledger and the transformer.
pub struct Monitor<T: Transformer> {
    root: PathBuf,
    matcher: Arc<PathMatcher>,
    fs: Arc<dyn FileSystem>,
    ledger: ErrorLedger,
    transformer: T,
}

impl<T: Transformer> std::fmt::Debug for Monitor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("root", &self.root)
            .field("patterns", &self.matcher.len())
            .field("failing", &self.ledger.len())
            .finish_non_exhaustive()
    }
}

impl<T: Transformer> Monitor<T> {
    pub fn new(
        config: MonitorConfiguration,
        fs: Arc<dyn FileSystem>,
        ledger: ErrorLedger,
        transformer: T,
    ) -> Self {
        let (root, matcher) = config.into_parts();
        Self {
            root,
            matcher: Arc::new(matcher),
            fs,
            ledger,
            transformer,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Shared handle to the matcher, for building a [`ChangeFeed`].
    pub fn matcher(&self) -> Arc<PathMatcher> {
        Arc::clone(&self.matcher)
    }

    pub fn ledger(&self) -> &ErrorLedger {
        &self.ledger
    }

    pub fn transformer(&self) -> &T {
        &self.transformer
    }

    /// Run one candidate through the pipeline.
    ///
    /// Only a fatal error (the compressor cannot be launched) is returned as
    /// `Err`; everything else is an outcome.
    pub async fn process_candidate(&mut self, path: &Path) -> Result<CandidateOutcome> {
        let monitored = path
            .parent()
            .map(|dir| self.matcher.matches(dir))
            .unwrap_or(false);
        if !monitored {
            return Ok(CandidateOutcome::Unmonitored);
        }

        if !self.fs.is_file(path) {
            return Ok(CandidateOutcome::Missing);
        }

        let Some(asset) = SourceAsset::from_path(path) else {
            return Ok(CandidateOutcome::NotAnAsset);
        };

        match check_staleness(self.fs.as_ref(), &asset, &self.ledger) {
            Ok(Staleness::Stale) => {}
            Ok(Staleness::Fresh) => return Ok(CandidateOutcome::Fresh),
            Ok(Staleness::KnownBroken { .. }) => {
                debug!(?path, "unchanged since last failure; skipping");
                return Ok(CandidateOutcome::Suppressed);
            }
            Err(err) => {
                debug!(?path, error = %err, "file vanished before staleness check; skipping");
                return Ok(CandidateOutcome::Missing);
            }
        }

        match self.transformer.transform(&asset).await {
            Ok(artifact) => {
                info!("Minified {}", path.display());
                self.update_ledger(path, true);
                Ok(CandidateOutcome::Transformed(artifact))
            }
            Err(MashError::TransformError { reason, .. }) => {
                error!("Error minifying {}: {reason}", path.display());
                self.update_ledger(path, false);
                Ok(CandidateOutcome::Failed(reason))
            }
            Err(fatal) => Err(fatal),
        }
    }

    /// Process a batch of candidates in order.
    pub async fn process_batch<I>(&mut self, paths: I) -> Result<CycleReport>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut report = CycleReport::default();
        for path in paths {
            let outcome = self.process_candidate(&path).await?;
            report.record(&path, &outcome);
        }
        Ok(report)
    }

    /// Consume batches from `feed` until it ends, `shutdown` resolves, or a
    /// fatal error occurs.
    ///
    /// `shutdown` is only observed between batches; a batch in progress is
    /// always finished so the ledger sidecar matches the last transformation.
    pub async fn run<S>(
        mut self,
        mut feed: ChangeFeed,
        options: MonitorOptions,
        shutdown: S,
    ) -> Result<()>
    where
        S: Future<Output = ()>,
    {
        info!(
            root = ?self.root,
            strategy = %feed.mode(),
            "monitoring JavaScript and CSS files for changes"
        );

        tokio::pin!(shutdown);

        loop {
            let batch = tokio::select! {
                batch = feed.next_batch() => batch,
                _ = &mut shutdown => {
                    info!("shutdown requested; stopping monitor");
                    break;
                }
            };

            let Some(batch) = batch else {
                warn!("change feed ended; stopping monitor");
                break;
            };

            let report = self.process_batch(batch).await?;
            if !report.transformed.is_empty() || !report.failed.is_empty() {
                debug!(
                    transformed = report.transformed.len(),
                    failed = report.failed.len(),
                    skipped = report.skipped,
                    "cycle complete"
                );
            }

            if options.exit_after_first_batch {
                break;
            }
        }

        if !self.ledger.is_empty() {
            warn!(
                failing = self.ledger.len(),
                "exiting with assets still failing; see {:?}",
                self.ledger.sidecar_path()
            );
        }
        Ok(())
    }

    fn update_ledger(&mut self, path: &Path, succeeded: bool) {
        let res = if succeeded {
            self.ledger.record_success(path)
        } else {
            self.ledger.record_failure(path)
        };
        if let Err(err) = res {
            warn!(error = %err, "failed to update error ledger");
        }
    }
}
