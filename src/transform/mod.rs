// src/transform/mod.rs

//! Minification boundary.
//!
//! The monitor only needs `transform(asset) -> Result<artifact>`:
//! - the call completes before the next candidate is looked at,
//! - `Err(MashError::TransformError { .. })` is a per-asset failure,
//! - `Err(MashError::LaunchError(..))` means the compressor cannot run at
//!   all and the monitor stops,
//! - on success the artifact exists at `asset.artifact_path()` and is newer
//!   than the source.
//!
//! [`CommandTransformer`] is the production implementation (an external
//! compressor process); tests plug in a fake.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use crate::asset::SourceAsset;
use crate::errors::Result;

pub mod command;

pub use command::{CommandTransformer, CompressorCommand, DEFAULT_COMPRESSOR_JAR};

/// Future returned by [`Transformer::transform`].
pub type TransformFuture<'a> = Pin<Box<dyn Future<Output = Result<PathBuf>> + Send + 'a>>;

/// Trait abstracting how one asset is minified.
pub trait Transformer: Send {
    /// Minify `asset`, returning the path of the artifact written.
    fn transform<'a>(&'a mut self, asset: &'a SourceAsset) -> TransformFuture<'a>;
}
