//! Fixtures shared by the `mashwatch` integration tests.

pub mod builders;
pub mod fake_transformer;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use mashwatch::logging::{LOG_ENV_VAR, filter_directives};
use tracing_subscriber::EnvFilter;

/// Upper bound for a single awaited step in a test.
pub const STEP_TIMEOUT: Duration = Duration::from_secs(5);

static TRACING: Once = Once::new();

/// Send `tracing` output to the harness's captured output.
///
/// Reads `MASHWATCH_LOG` the same way the binary does, so
/// `MASHWATCH_LOG=debug cargo test -- --nocapture` shows the pipeline.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let env = std::env::var(LOG_ENV_VAR).ok();
        let filter = EnvFilter::try_new(filter_directives(None, env.as_deref()))
            .unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_test_writer()
            .try_init();
    });
}

/// Await `fut`, panicking if it runs longer than [`STEP_TIMEOUT`].
pub async fn with_timeout<F: Future>(fut: F) -> F::Output {
    match tokio::time::timeout(STEP_TIMEOUT, fut).await {
        Ok(output) => output,
        Err(_) => panic!("test step did not finish within {STEP_TIMEOUT:?}"),
    }
}
