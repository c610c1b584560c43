//! Execution context shared by every extension operation

use crate::config::Settings;
use crate::process::{CommandOutput, CommandRunner, Invocation, ProcessError, SystemRunner};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Project root, process runner and settings for one command invocation
#[derive(Clone)]
pub struct ExtensionContext {
    root: PathBuf,
    runner: Arc<dyn CommandRunner>,
    settings: Settings,
}

impl ExtensionContext {
    /// Context backed by real processes
    pub fn new(root: impl Into<PathBuf>, settings: Settings) -> Self {
        Self::with_runner(root, Arc::new(SystemRunner), settings)
    }

    pub fn with_runner(
        root: impl Into<PathBuf>,
        runner: Arc<dyn CommandRunner>,
        settings: Settings,
    ) -> Self {
        Self {
            root: root.into(),
            runner,
            settings,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Resolve `path` against the project root (absolute paths pass through)
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    pub async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, ProcessError> {
        self.runner.run(invocation).await
    }
}

impl fmt::Debug for ExtensionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionContext")
            .field("root", &self.root)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_and_absolute_paths() {
        let ctx = ExtensionContext::new("/work/project", Settings::default());
        assert_eq!(
            ctx.resolve(Path::new("my-extension")),
            PathBuf::from("/work/project/my-extension")
        );
        assert_eq!(ctx.resolve(Path::new("/tmp/other")), PathBuf::from("/tmp/other"));
    }
}
