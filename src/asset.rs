// src/asset.rs

//! Which files are source assets, and where their minified artifact lives.

use std::path::{Path, PathBuf};

/// Prefix marking a hidden file; such files are never monitored.
const HIDDEN_MARKER: char = '.';

/// Recognised kinds of source asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Script,
    Stylesheet,
}

impl AssetKind {
    pub const ALL: [AssetKind; 2] = [AssetKind::Script, AssetKind::Stylesheet];

    /// Suffix of a source file of this kind, e.g. `.js`.
    pub fn raw_suffix(self) -> &'static str {
        match self {
            AssetKind::Script => ".js",
            AssetKind::Stylesheet => ".css",
        }
    }

    /// Suffix of the artifact produced from this kind, e.g. `.min.js`.
    pub fn minified_suffix(self) -> &'static str {
        match self {
            AssetKind::Script => ".min.js",
            AssetKind::Stylesheet => ".min.css",
        }
    }

    fn of_file_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| name.ends_with(kind.raw_suffix()))
    }
}

/// A file eligible for minification.
///
/// Only constructible from a monitorable path, which makes
/// [`SourceAsset::artifact_path`] total.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceAsset {
    path: PathBuf,
    kind: AssetKind,
}

impl SourceAsset {
    /// Classify `path`; `None` unless [`is_monitorable`] holds.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let kind = classify(&path)?;
        Some(Self { path, kind })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// Same directory, same base name, raw suffix replaced by the minified one.
    ///
    /// Only the file name is rewritten, so `/a/.js/foo.js` becomes
    /// `/a/.js/foo.min.js`.
    pub fn artifact_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let stem = &name[..name.len() - self.kind.raw_suffix().len()];
        self.path
            .with_file_name(format!("{stem}{}", self.kind.minified_suffix()))
    }
}

/// Script or stylesheet that is neither hidden nor already minified.
pub fn is_monitorable(path: &Path) -> bool {
    classify(path).is_some()
}

/// Artifact path for a monitorable source, `None` for anything else.
pub fn artifact_path_for(path: &Path) -> Option<PathBuf> {
    SourceAsset::from_path(path).map(|asset| asset.artifact_path())
}

fn classify(path: &Path) -> Option<AssetKind> {
    let name = path.file_name()?.to_str()?;

    if name.starts_with(HIDDEN_MARKER) {
        return None;
    }

    let kind = AssetKind::of_file_name(name)?;

    if name.ends_with(kind.minified_suffix()) {
        return None;
    }

    Some(kind)
}
