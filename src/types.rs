use std::fmt;

use clap::ValueEnum;

/// Which change-detection strategy to run.
///
/// - `Auto`: use native filesystem notifications when a watcher can be
///   created on this platform, otherwise fall back to polling (default).
/// - `Poll`: rescan the whole tree once per interval.
/// - `Event`: require native notifications; fail if they are unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FeedMode {
    #[default]
    Auto,
    Poll,
    Event,
}

impl fmt::Display for FeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FeedMode::Auto => "auto",
            FeedMode::Poll => "poll",
            FeedMode::Event => "event",
        };
        f.write_str(s)
    }
}
