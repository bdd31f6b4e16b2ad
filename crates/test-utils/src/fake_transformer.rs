use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use mashwatch::asset::SourceAsset;
use mashwatch::errors::MashError;
use mashwatch::fs::FileSystem;
use mashwatch::transform::{TransformFuture, Transformer};

/// Contents written to every artifact produced by [`FakeTransformer`].
pub const FAKE_ARTIFACT: &[u8] = b"/* minified */";

/// A fake transformer that:
/// - records which sources it was asked to minify
/// - writes a small artifact through the filesystem abstraction
/// - fails for sources marked with [`FakeTransformer::fail_on`]
///
/// Clones share state, so a test can keep one handle while the monitor
/// owns another.
#[derive(Debug, Clone)]
pub struct FakeTransformer {
    fs: Arc<dyn FileSystem>,
    calls: Arc<Mutex<Vec<PathBuf>>>,
    failing: Arc<Mutex<HashSet<PathBuf>>>,
    unlaunchable: bool,
}

impl FakeTransformer {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            calls: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(Mutex::new(HashSet::new())),
            unlaunchable: false,
        }
    }

    /// A transformer whose compressor can never be started.
    pub fn unlaunchable(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            unlaunchable: true,
            ..Self::new(fs)
        }
    }

    pub fn fail_on(&self, path: impl AsRef<Path>) {
        self.failing.lock().unwrap().insert(path.as_ref().to_path_buf());
    }

    pub fn stop_failing_on(&self, path: impl AsRef<Path>) {
        self.failing.lock().unwrap().remove(path.as_ref());
    }

    /// Sources passed to `transform`, in call order.
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transformer for FakeTransformer {
    fn transform<'a>(&'a mut self, asset: &'a SourceAsset) -> TransformFuture<'a> {
        Box::pin(async move {
            if self.unlaunchable {
                return Err(MashError::LaunchError("fake compressor missing".to_string()));
            }

            let source = asset.path().to_path_buf();
            self.calls.lock().unwrap().push(source.clone());

            if self.failing.lock().unwrap().contains(&source) {
                return Err(MashError::TransformError {
                    path: source,
                    reason: "fake syntax error".to_string(),
                });
            }

            let artifact = asset.artifact_path();
            self.fs.write(&artifact, FAKE_ARTIFACT)?;
            Ok(artifact)
        })
    }
}
