// src/logging.rs

//! Log output for `mashwatch`.
//!
//! The filter comes from `--log-level` if given, then `MASHWATCH_LOG`, then
//! `info`. `MASHWATCH_LOG` accepts full `EnvFilter` directives, e.g.
//! `MASHWATCH_LOG=mashwatch=debug,notify=trace`.
//!
//! Lines go to stderr without module targets: the interesting output is one
//! `Minified ...` or `Error minifying ...` line per asset.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

/// Environment variable read when `--log-level` is absent.
pub const LOG_ENV_VAR: &str = "MASHWATCH_LOG";

const DEFAULT_DIRECTIVES: &str = "info,notify=warn";

pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV_VAR).ok();
    let directives = filter_directives(cli_level, env.as_deref());
    let filter = EnvFilter::try_new(&directives)
        .with_context(|| format!("invalid log filter {directives:?}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("initialising logging: {e}"))
}

/// Filter directives for the given CLI level and `MASHWATCH_LOG` value.
///
/// A CLI level applies to this crate only; the watcher backend stays at
/// `warn` unless the environment asks for more.
pub fn filter_directives(cli_level: Option<LogLevel>, env: Option<&str>) -> String {
    match (cli_level, env.map(str::trim).filter(|s| !s.is_empty())) {
        (Some(level), _) => format!("{},notify=warn", level.as_str()),
        (None, Some(env)) => env.to_string(),
        (None, None) => DEFAULT_DIRECTIVES.to_string(),
    }
}
