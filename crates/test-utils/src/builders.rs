#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use mashwatch::config::{CONFIG_FILE_NAME, MonitorConfiguration, load_configuration};
use mashwatch::fs::FileSystem;
use mashwatch::fs::mock::MockFileSystem;
use mashwatch::ledger::ErrorLedger;
use mashwatch::monitor::Monitor;
use mashwatch::transform::Transformer;

/// Builder for an in-memory project tree to simplify test setup.
///
/// Paths given to the builder are relative to the project root.
pub struct ProjectBuilder {
    root: PathBuf,
    fs: MockFileSystem,
    config: Option<String>,
}

impl ProjectBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let fs = MockFileSystem::new();
        fs.add_dir(&root);
        Self {
            root,
            fs,
            config: None,
        }
    }

    /// Contents of the `.mash` file.
    pub fn with_config(mut self, text: &str) -> Self {
        self.config = Some(text.to_string());
        self
    }

    /// A file last modified `age` ago.
    pub fn with_file(self, rel: &str, age: Duration) -> Self {
        let modified = SystemTime::now() - age;
        self.fs
            .add_file_modified_at(self.root.join(rel), b"content".to_vec(), modified);
        self
    }

    pub fn with_dir(self, rel: &str) -> Self {
        self.fs.add_dir(self.root.join(rel));
        self
    }

    pub fn build(self) -> TestProject {
        let config_text = self.config.unwrap_or_default();
        self.fs.add_file_modified_at(
            self.root.join(CONFIG_FILE_NAME),
            config_text.into_bytes(),
            SystemTime::now() - Duration::from_secs(3600),
        );
        let config = load_configuration(&self.fs, &self.root)
            .expect("Failed to load config from builder");
        TestProject {
            root: self.root,
            fs: self.fs,
            config,
        }
    }
}

/// A built in-memory project.
pub struct TestProject {
    pub root: PathBuf,
    pub fs: MockFileSystem,
    pub config: MonitorConfiguration,
}

impl TestProject {
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    pub fn shared_fs(&self) -> Arc<dyn FileSystem> {
        Arc::new(self.fs.clone())
    }

    pub fn ledger(&self) -> ErrorLedger {
        ErrorLedger::new(&self.root, self.shared_fs())
    }

    pub fn monitor<T: Transformer>(&self, transformer: T) -> Monitor<T> {
        Monitor::new(
            self.config.clone(),
            self.shared_fs(),
            self.ledger(),
            transformer,
        )
    }

    /// Simulate an edit: bump the file's mtime `ahead` into the future.
    pub fn touch(&self, rel: &str, ahead: Duration) {
        self.fs
            .set_modified(self.path(rel), SystemTime::now() + ahead)
            .expect("touching a file that does not exist");
    }

    pub fn exists(&self, path: &Path) -> bool {
        self.fs.exists(path)
    }
}
