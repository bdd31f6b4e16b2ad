// src/staleness.rs

//! Decide whether a source asset needs (re)minifying.
//!
//! Only two signals are used: filesystem modification times and the error
//! ledger. File contents are never hashed.

use std::time::SystemTime;

use anyhow::Result;

use crate::asset::SourceAsset;
use crate::fs::FileSystem;
use crate::ledger::ErrorLedger;

/// Verdict for one source asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    /// The artifact exists and is strictly newer than the source.
    Fresh,
    /// The last attempt failed after the source was last edited.
    KnownBroken { failed_at: SystemTime },
    /// The asset must be minified.
    Stale,
}

impl Staleness {
    pub fn needs_transformation(self) -> bool {
        matches!(self, Staleness::Stale)
    }
}

/// Check `asset` against its artifact and the ledger, in that order.
///
/// Fails only when the source's mtime cannot be read, typically because the
/// file vanished after it was discovered; callers skip it for this cycle.
pub fn check_staleness(
    fs: &dyn FileSystem,
    asset: &SourceAsset,
    ledger: &ErrorLedger,
) -> Result<Staleness> {
    let source_modified = fs.modified(asset.path())?;

    if let Ok(artifact_modified) = fs.modified(&asset.artifact_path()) {
        if artifact_modified > source_modified {
            return Ok(Staleness::Fresh);
        }
    }

    // An edit after the failure moves the source mtime past the record,
    // which re-qualifies the asset without touching the ledger.
    if let Some(failed_at) = ledger.failed_at(asset.path()) {
        if failed_at > source_modified {
            return Ok(Staleness::KnownBroken { failed_at });
        }
    }

    Ok(Staleness::Stale)
}

/// Convenience wrapper around [`check_staleness`].
pub fn needs_transformation(
    fs: &dyn FileSystem,
    asset: &SourceAsset,
    ledger: &ErrorLedger,
) -> Result<bool> {
    check_staleness(fs, asset, ledger).map(Staleness::needs_transformation)
}
