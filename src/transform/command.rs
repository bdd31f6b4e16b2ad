// src/transform/command.rs

//! Minification through an external compressor process.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::SystemTime;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::asset::SourceAsset;
use crate::errors::{MashError, Result};
use crate::fs::FileSystem;

use super::{TransformFuture, Transformer};

/// Jar looked up next to the `mashwatch` executable when no compressor is given.
pub const DEFAULT_COMPRESSOR_JAR: &str = "yuicompressor-2.4.5.jar";

/// Program plus leading arguments; the source path is appended as the last
/// argument and the minified output is read from stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressorCommand {
    program: String,
    args: Vec<String>,
}

impl CompressorCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Parse a whitespace-separated command line, e.g. `"uglifyjs -c"`.
    pub fn parse(command_line: &str) -> Result<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| MashError::ConfigError("compressor command is empty".to_string()))?;
        Ok(Self::new(program, parts.collect()))
    }

    /// `java -jar <dir>/yuicompressor-2.4.5.jar`, where `<dir>` holds the
    /// running executable.
    pub fn yui_compressor() -> Self {
        let jar = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_COMPRESSOR_JAR)))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_COMPRESSOR_JAR));

        Self::new(
            "java",
            vec!["-jar".to_string(), jar.to_string_lossy().into_owned()],
        )
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Make sure the command can be launched at all.
    ///
    /// The program must be found on `PATH` (or be an existing path), and a
    /// `-jar <file>` argument must name an existing file.
    pub fn verify(&self) -> Result<PathBuf> {
        let resolved = which::which(&self.program).map_err(|e| {
            MashError::LaunchError(format!("cannot find `{}`: {e}", self.program))
        })?;

        let mut args = self.args.iter();
        while let Some(arg) = args.next() {
            if arg == "-jar" {
                if let Some(jar) = args.next() {
                    if !Path::new(jar).is_file() {
                        return Err(MashError::LaunchError(format!(
                            "compressor jar {jar:?} does not exist"
                        )));
                    }
                }
            }
        }

        debug!(program = ?resolved, "compressor located");
        Ok(resolved)
    }
}

impl fmt::Display for CompressorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Runs a [`CompressorCommand`] per asset and writes its stdout to the artifact.
///
/// A run fails when the process exits unsuccessfully or prints anything on
/// stderr. The artifact is only replaced on success.
///
/// If the source is edited while the compressor runs, the new artifact is
/// backdated to the source's mtime from before the run so the edit still
/// reads as stale on the next cycle.
#[derive(Debug)]
pub struct CommandTransformer {
    command: CompressorCommand,
    fs: Arc<dyn FileSystem>,
}

impl CommandTransformer {
    pub fn new(command: CompressorCommand, fs: Arc<dyn FileSystem>) -> Self {
        Self { command, fs }
    }

    pub fn command(&self) -> &CompressorCommand {
        &self.command
    }

    async fn run(&self, asset: &SourceAsset) -> Result<PathBuf> {
        let source = asset.path();
        debug!(command = %self.command, ?source, "starting compressor");
        let modified_before = self.fs.modified(source).ok();

        let output = Command::new(&self.command.program)
            .args(&self.command.args)
            .arg(source)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| MashError::LaunchError(format!("running `{}`: {e}", self.command)))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() || !stderr.trim().is_empty() {
            let reason = stderr
                .lines()
                .map(str::trim)
                .find(|l| !l.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("compressor exited with {}", output.status));
            return Err(MashError::TransformError {
                path: source.to_path_buf(),
                reason,
            });
        }

        let artifact = asset.artifact_path();
        self.fs
            .write(&artifact, &output.stdout)
            .map_err(|e| MashError::TransformError {
                path: source.to_path_buf(),
                reason: format!("{e:#}"),
            })?;

        if let Some(before) = modified_before {
            self.keep_stale_if_edited(source, &artifact, before);
        }

        Ok(artifact)
    }

    fn keep_stale_if_edited(&self, source: &Path, artifact: &Path, before: SystemTime) {
        let Ok(after) = self.fs.modified(source) else {
            return;
        };
        if after == before {
            return;
        }

        debug!(?source, "source changed during minification; backdating artifact");
        if let Err(err) = self.fs.set_modified(artifact, before) {
            warn!(?artifact, error = %err, "cannot backdate artifact; removing it");
            if let Err(err) = self.fs.remove_file(artifact) {
                warn!(?artifact, error = %err, "cannot remove outdated artifact");
            }
        }
    }
}

impl Transformer for CommandTransformer {
    fn transform<'a>(&'a mut self, asset: &'a SourceAsset) -> TransformFuture<'a> {
        Box::pin(self.run(asset))
    }
}
