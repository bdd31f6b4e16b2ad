// src/config/patterns.rs

//! The `.mash` pattern language.
//!
//! Each non-blank, non-comment line is a regular expression for a directory,
//! relative to the project root:
//!
//! ```text
//! # monitor everything directly inside static/js
//! static/js
//! # and every theme's css directory
//! themes/[^/]+/css
//! ```
//!
//! A line is compiled into a regex that must match a whole absolute,
//! `/`-separated directory path. Lines ending in a path separator are a
//! user error: they are reported and dropped, never silently matched.

use std::fmt;
use std::path::Path;

use regex::Regex;
use tracing::warn;

use crate::path_utils::normalize_separators;

/// Why a configuration line was left out of the compiled set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The line ends with `/` (or `\`), which would never match a directory.
    TrailingSeparator,
    /// The line is not a valid regular expression.
    InvalidRegex(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::TrailingSeparator => {
                f.write_str("directory regexps must not end with '/'")
            }
            RejectReason::InvalidRegex(err) => write!(f, "invalid regular expression: {err}"),
        }
    }
}

/// A configuration line that was reported and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-based line number in the configuration text.
    pub line_number: usize,
    pub line: String,
    pub reason: RejectReason,
}

/// One compiled configuration line, anchored to the full absolute path.
#[derive(Debug, Clone)]
pub struct PathPattern {
    line_number: usize,
    source: String,
    regex: Regex,
}

impl PathPattern {
    /// The line as written in the configuration (trimmed).
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// The anchored regex actually used for matching.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, normalized_path: &str) -> bool {
        self.regex.is_match(normalized_path)
    }
}

/// Ordered set of compiled patterns deciding which directories are monitored.
#[derive(Debug, Clone, Default)]
pub struct PathMatcher {
    patterns: Vec<PathPattern>,
    rejected: Vec<RejectedLine>,
}

impl PathMatcher {
    /// Compile configuration text against `project_root`.
    ///
    /// Never fails: bad lines are logged with `warn!` and recorded in
    /// [`PathMatcher::rejected`].
    pub fn compile(configuration: &str, project_root: &Path) -> Self {
        let root = normalize_separators(project_root);
        let mut patterns = Vec::new();
        let mut rejected = Vec::new();

        for (idx, raw) in configuration.lines().enumerate() {
            let line_number = idx + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let outcome = if line.ends_with('/') || line.ends_with('\\') {
                Err(RejectReason::TrailingSeparator)
            } else {
                Regex::new(&anchored_regex(&root, line))
                    .map_err(|e| RejectReason::InvalidRegex(e.to_string()))
            };

            match outcome {
                Ok(regex) => patterns.push(PathPattern {
                    line_number,
                    source: line.to_string(),
                    regex,
                }),
                Err(reason) => {
                    warn!(
                        line = line_number,
                        pattern = %line,
                        "{reason}; line {line_number} will not do anything"
                    );
                    rejected.push(RejectedLine {
                        line_number,
                        line: line.to_string(),
                        reason,
                    });
                }
            }
        }

        Self { patterns, rejected }
    }

    /// Returns true if any pattern matches the whole of `path`.
    ///
    /// An empty matcher matches nothing.
    pub fn matches(&self, path: &Path) -> bool {
        let normalized = normalize_separators(path);
        self.patterns.iter().any(|p| p.is_match(&normalized))
    }

    pub fn patterns(&self) -> &[PathPattern] {
        &self.patterns
    }

    pub fn rejected(&self) -> &[RejectedLine] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Join `line` under `root` the way a path join would, then anchor it.
///
/// The root is escaped so it matches literally; the line is the user's regex
/// and is grouped so an alternation stays under the root. A line that is
/// already absolute replaces the root.
fn anchored_regex(root: &str, line: &str) -> String {
    if line.starts_with('/') {
        return format!("^(?:{line})$");
    }

    let root = root.trim_end_matches('/');
    format!("^{}/(?:{line})$", regex::escape(root))
}
