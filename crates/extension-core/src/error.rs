//! Errors surfaced by extension operations
//!
//! Every variant is terminal: the command prints the message and exits.

use crate::process::ProcessError;
use crate::runtime::check::CheckFailure;
use crate::script::ScriptError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtensionError {
    #[error("Missing required dependencies:\n{}", format_failures(.failures))]
    DependencyCheckFailed { failures: Vec<CheckFailure> },

    #[error("Failed to clone template {template}: {reason}")]
    CloneFailed { template: String, reason: String },

    #[error(
        "Could not find built extension file {}. Build the extension before packaging it.",
        .path.display()
    )]
    MissingScriptFile { path: PathBuf },

    /// The cause is kept as the error source but not shown in the message
    #[error("An error occurred while preparing the extension script for upload.")]
    ScriptReadOrEncodeFailed {
        #[source]
        source: ScriptError,
    },

    #[error("Could not list the installed version of {package}: {source}")]
    RendererProcessError {
        package: String,
        #[source]
        source: ProcessError,
    },

    #[error("No installed version of {package} found. Install project dependencies and try again.")]
    VersionNotFound { package: String },

    #[error("Renderer package name must not be empty")]
    InvalidRendererPackage,
}

pub type Result<T, E = ExtensionError> = std::result::Result<T, E>;

fn format_failures(failures: &[CheckFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("  - {}", f))
        .collect::<Vec<_>>()
        .join("\n")
}
