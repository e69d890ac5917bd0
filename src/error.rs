use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Fatal errors for a collect run.
///
/// Every variant aborts the whole run: there is no per-line isolation, no
/// retry, and no partial-success mode. Events that merely fail the filters
/// (foreign reason tags, missing executables, proc-macro targets) are not
/// errors and are skipped silently.
#[derive(Error, Debug)]
pub enum CollectError {
    #[error("build_command is empty")]
    EmptyBuildCommand,

    #[error("failed to launch build command '{command}'")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("build command exited with {status}:\n{stderr}")]
    Build { status: ExitStatus, stderr: String },

    #[error("build output is not valid UTF-8")]
    NonUtf8Output(#[from] std::string::FromUtf8Error),

    #[error("malformed build event on line {line}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("build event on line {line} has an empty package_id")]
    EmptyPackageId { line: usize },

    #[error("failed to create destination directory {}", .dir.display())]
    CreateDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to copy {} to {}", .src.display(), .dest.display())]
    Copy {
        src: PathBuf,
        dest: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
