// src/lib.rs

pub mod asset;
pub mod cli;
pub mod config;
pub mod errors;
pub mod feed;
pub mod fs;
pub mod ledger;
pub mod logging;
pub mod monitor;
pub mod path_utils;
pub mod staleness;
pub mod transform;
pub mod types;

use std::sync::Arc;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{MonitorConfiguration, config_path, load_configuration, resolve_root};
use crate::errors::Result;
use crate::feed::ChangeFeed;
use crate::fs::{FileSystem, RealFileSystem};
use crate::ledger::ErrorLedger;
use crate::monitor::{Monitor, MonitorOptions};
use crate::transform::CommandTransformer;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - project root + `.mash` loading (fatal if missing)
/// - compressor discovery (fatal if it cannot be launched)
/// - error ledger
/// - change feed (poll or native events)
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    let root = resolve_root(fs.as_ref(), &args.project_root)?;
    let config = load_configuration(fs.as_ref(), &root)?;

    if args.dry_run {
        print_dry_run(&config);
        return Ok(());
    }

    let command = args.compressor_command()?;
    command.verify()?;
    info!(compressor = %command, "using compressor");

    let transformer = CommandTransformer::new(command, Arc::clone(&fs));
    let ledger = ErrorLedger::open(&root, Arc::clone(&fs))?;
    let monitor = Monitor::new(config, Arc::clone(&fs), ledger, transformer);

    // --once always scans; a watcher would have nothing to wait for.
    let feed = if args.once {
        ChangeFeed::poll(root.clone(), monitor.matcher(), fs, args.poll_interval())
    } else {
        ChangeFeed::select(
            args.mode,
            root.clone(),
            monitor.matcher(),
            fs,
            args.poll_interval(),
        )?
    };

    let options = MonitorOptions {
        exit_after_first_batch: args.once,
    };

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    info!("press Ctrl-C to quit");
    monitor.run(feed, options, shutdown).await
}

/// Simple dry-run output: print compiled and rejected patterns.
fn print_dry_run(config: &MonitorConfiguration) {
    println!("mashwatch dry-run");
    println!("  root = {}", config.root().display());
    println!("  config = {}", config_path(config.root()).display());
    println!();

    let matcher = config.matcher();
    println!("patterns ({}):", matcher.len());
    for pattern in matcher.patterns() {
        println!(
            "  - line {}: {}  =>  {}",
            pattern.line_number(),
            pattern.source(),
            pattern.as_str()
        );
    }

    if !matcher.rejected().is_empty() {
        println!("rejected ({}):", matcher.rejected().len());
        for rejected in matcher.rejected() {
            println!(
                "  - line {}: {}  ({})",
                rejected.line_number, rejected.line, rejected.reason
            );
        }
    }

    debug!("dry-run complete (no minification)");
}
