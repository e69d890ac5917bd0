//! Typed model of the build tool's line-delimited event stream.

use std::path::PathBuf;

use serde::Deserialize;

/// One decoded line of build output, tagged by its `reason` field.
///
/// Only compiler-artifact events carry data we act on; every other tag
/// decodes to [`BuildEvent::Other`] and is skipped by filtering. A line
/// whose tag is `compiler-artifact` but which is missing a required field
/// fails to decode, which aborts the whole run.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "reason")]
pub enum BuildEvent {
    #[serde(rename = "compiler-artifact")]
    CompilerArtifact(ArtifactEvent),
    /// Any other reason tag (build-script-executed, build-finished, ...).
    #[serde(other)]
    Other,
}

/// A compiler-artifact event.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactEvent {
    /// Package identifier; its first whitespace-delimited token is the bare
    /// package name.
    pub package_id: String,
    /// Build target that produced the artifact.
    pub target: Target,
    /// Profile the artifact was built under.
    pub profile: Profile,
    /// Path to the produced executable, when the target produced one.
    #[serde(default)]
    pub executable: Option<PathBuf>,
}

/// Build target description.
#[derive(Debug, Clone, Deserialize)]
pub struct Target {
    /// Target name, used as the destination file name.
    pub name: String,
    /// Target kinds (bin, lib, test, proc-macro, ...).
    #[serde(default)]
    pub kind: Vec<String>,
}

/// Subset of the build profile used for classification.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    /// True when the artifact is a test harness binary.
    pub test: bool,
}

impl ArtifactEvent {
    /// Bare package name: the first whitespace-delimited token of
    /// `package_id`. `None` when the id has no tokens at all.
    pub fn package_name(&self) -> Option<&str> {
        self.package_id.split_whitespace().next()
    }

    /// Whether the target is a procedural macro.
    pub fn is_proc_macro(&self) -> bool {
        self.target.kind.iter().any(|k| k == "proc-macro")
    }
}
