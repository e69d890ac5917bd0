use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Collector configuration: where artifacts land and how the build is
/// invoked.
///
/// Both halves are explicit so tests can substitute a fake build command
/// and a scratch workspace.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Root of the destination tree (`<root>/{bins,tests}/<package>/<name>`).
    pub workspace_root: PathBuf,
    /// Argv of the build invocation, program first.
    pub build_command: Vec<String>,
    /// Working directory for the build command; `None` inherits ours.
    pub project_dir: Option<PathBuf>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            workspace_root: PathBuf::from("/tmp/workspace"),
            build_command: ["cargo", "build", "--all-targets", "--message-format=json"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            project_dir: None,
        }
    }
}

/// Raw TOML file structure for
/// `~/.config/artifact-collector/config.toml`.
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    workspace_root: Option<PathBuf>,
    build_command: Option<Vec<String>>,
    project_dir: Option<PathBuf>,
}

/// Default config file location.
fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .expect("could not determine config directory")
        .join("artifact-collector")
        .join("config.toml")
}

impl CollectorConfig {
    /// Load configuration from an optional TOML file.
    ///
    /// A missing file at the default location yields the defaults; a file
    /// named explicitly must exist and parse.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let explicit = config_path.is_some();
        let path = config_path.cloned().unwrap_or_else(default_config_path);

        let file = if explicit || path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ConfigFile>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        } else {
            ConfigFile::default()
        };

        Ok(Self::from_file(file))
    }

    /// Build config from parsed file values, falling back to defaults.
    fn from_file(file: ConfigFile) -> Self {
        let defaults = Self::default();
        Self {
            workspace_root: file.workspace_root.unwrap_or(defaults.workspace_root),
            build_command: file.build_command.unwrap_or(defaults.build_command),
            project_dir: file.project_dir,
        }
    }
}
