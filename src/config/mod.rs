// src/config/mod.rs

//! Configuration loading for mashwatch.
//!
//! Responsibilities:
//! - Compile the `.mash` pattern language (`patterns.rs`).
//! - Load the configuration file from the project root (`loader.rs`).

pub mod loader;
pub mod patterns;

pub use loader::{
    CONFIG_FILE_NAME, MonitorConfiguration, config_path, load_configuration, resolve_root,
};
pub use patterns::{PathMatcher, PathPattern, RejectReason, RejectedLine};
