// src/config/loader.rs

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::patterns::PathMatcher;
use crate::errors::{MashError, Result};
use crate::fs::FileSystem;

/// Name of the per-project configuration file, looked up in the project root.
pub const CONFIG_FILE_NAME: &str = ".mash";

/// Everything loaded once at startup: the project root and its patterns.
///
/// Immutable for the lifetime of the process; there is no hot-reload.
#[derive(Debug, Clone)]
pub struct MonitorConfiguration {
    root: PathBuf,
    matcher: PathMatcher,
}

impl MonitorConfiguration {
    /// Build a configuration from already-read `.mash` text.
    pub fn from_text(root: impl Into<PathBuf>, text: &str) -> Self {
        let root = root.into();
        let matcher = PathMatcher::compile(text, &root);
        Self { root, matcher }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn matcher(&self) -> &PathMatcher {
        &self.matcher
    }

    pub fn into_parts(self) -> (PathBuf, PathMatcher) {
        (self.root, self.matcher)
    }
}

/// Path of the configuration file for a given project root.
pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Load `<root>/.mash` and compile it.
///
/// - A missing file is [`MashError::MissingConfig`].
/// - An unreadable file is [`MashError::ConfigError`].
///
/// Individual bad lines are not errors; they are reported by the matcher.
pub fn load_configuration(fs: &dyn FileSystem, root: &Path) -> Result<MonitorConfiguration> {
    let path = config_path(root);

    if !fs.is_file(&path) {
        return Err(MashError::MissingConfig {
            root: root.to_path_buf(),
        });
    }

    let text = fs
        .read_to_string(&path)
        .map_err(|e| MashError::ConfigError(format!("reading {:?}: {e:#}", path)))?;

    let config = MonitorConfiguration::from_text(root, &text);
    debug!(
        patterns = config.matcher().len(),
        rejected = config.matcher().rejected().len(),
        "loaded configuration from {:?}",
        path
    );
    Ok(config)
}

/// Canonicalize the project root given on the command line.
pub fn resolve_root(fs: &dyn FileSystem, root: &Path) -> Result<PathBuf> {
    if !fs.is_dir(root) {
        return Err(MashError::ConfigError(format!(
            "project root {:?} is not a directory",
            root
        )));
    }
    fs.canonicalize(root)
        .map_err(|e| MashError::ConfigError(format!("{e:#}")))
}
