//! Artifact collection
//!
//! Runs the configured build command, decodes its buffered event stream,
//! and copies every qualifying executable into the workspace tree.

use std::fmt;
use std::fs;
use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::config::CollectorConfig;
use crate::error::CollectError;
use crate::event::{ArtifactEvent, BuildEvent};

/// Destination bucket for a collected artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// Regular executables.
    Bins,
    /// Test harness executables.
    Tests,
}

impl Bucket {
    /// Bucket for an artifact built under the given profile.
    fn for_artifact(artifact: &ArtifactEvent) -> Self {
        if artifact.profile.test {
            Bucket::Tests
        } else {
            Bucket::Bins
        }
    }

    /// Directory name under the workspace root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Bucket::Bins => "bins",
            Bucket::Tests => "tests",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Collects build artifacts into a workspace tree.
///
/// A run is all-or-nothing: the first fatal error (build failure, malformed
/// event line, filesystem failure) aborts the whole run. Events that merely
/// fail the filters are skipped without effect.
pub struct Collector {
    config: CollectorConfig,
}

impl Collector {
    pub fn new(config: CollectorConfig) -> Self {
        Self { config }
    }

    /// Run the build command and copy every qualifying executable to
    /// `<workspace_root>/<bucket>/<package name>/<target name>`.
    ///
    /// The build's entire output is buffered before any line is processed.
    pub fn collect(&self) -> Result<(), CollectError> {
        let stdout = self.run_build()?;
        self.process_output(&stdout)
    }

    /// Invoke the build command and return its buffered stdout.
    fn run_build(&self) -> Result<String, CollectError> {
        let (program, args) = self
            .config
            .build_command
            .split_first()
            .ok_or(CollectError::EmptyBuildCommand)?;

        let mut command = Command::new(program);
        command.args(args);
        if let Some(ref dir) = self.config.project_dir {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|source| CollectError::Spawn {
            command: program.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(CollectError::Build {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8(output.stdout)?)
    }

    /// Decode, filter, classify, and copy each event line.
    fn process_output(&self, stdout: &str) -> Result<(), CollectError> {
        for (idx, line) in stdout.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let line_no = idx + 1;

            let event: BuildEvent = serde_json::from_str(line).map_err(|source| {
                CollectError::Decode {
                    line: line_no,
                    source,
                }
            })?;

            let artifact = match event {
                BuildEvent::CompilerArtifact(artifact) => artifact,
                BuildEvent::Other => continue,
            };

            let executable = match artifact.executable.as_deref() {
                Some(path) => path,
                None => {
                    debug!(target = %artifact.target.name, "skipping artifact without executable");
                    continue;
                }
            };

            if artifact.is_proc_macro() {
                debug!(target = %artifact.target.name, "skipping proc-macro target");
                continue;
            }

            let package_name = artifact
                .package_name()
                .ok_or(CollectError::EmptyPackageId { line: line_no })?;
            let bucket = Bucket::for_artifact(&artifact);

            let dest_dir = self
                .config
                .workspace_root
                .join(bucket.dir_name())
                .join(package_name);
            let dest = dest_dir.join(&artifact.target.name);

            copy_artifact(executable, &dest_dir, &dest)?;

            info!(
                package = %package_name,
                bucket = %bucket,
                dest = %dest.display(),
                "collected artifact"
            );
        }

        Ok(())
    }
}

/// Copy one artifact into its destination directory, creating the directory
/// and any missing ancestors. Overwrites an existing file silently and
/// carries the source permissions and modification time over.
fn copy_artifact(src: &Path, dest_dir: &Path, dest: &Path) -> Result<(), CollectError> {
    fs::create_dir_all(dest_dir).map_err(|source| CollectError::CreateDir {
        dir: dest_dir.to_path_buf(),
        source,
    })?;

    fs::copy(src, dest).map_err(|source| CollectError::Copy {
        src: src.to_path_buf(),
        dest: dest.to_path_buf(),
        source,
    })?;

    // fs::copy keeps permission bits; the mtime needs to be set separately.
    if let Ok(modified) = fs::metadata(src).and_then(|m| m.modified()) {
        fs::File::options()
            .write(true)
            .open(dest)
            .and_then(|file| file.set_modified(modified))
            .map_err(|source| CollectError::Copy {
                src: src.to_path_buf(),
                dest: dest.to_path_buf(),
                source,
            })?;
    }

    Ok(())
}
