//! JavaScript package manager detection and invocation
//!
//! A project uses yarn when it carries a `yarn.lock` and yarn is installed;
//! everything else goes through npm. Callers describe one logical command with
//! arguments for both managers and [`JsSystem::call`] runs the right one.

use crate::config::PackageManagerPreference;
use crate::context::ExtensionContext;
use crate::process::{Invocation, ProcessError};
use std::fmt;
use tracing::debug;

/// Lockfile whose presence selects yarn
const YARN_LOCKFILE: &str = "yarn.lock";

/// Supported package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    /// JSON-capable `list` output
    Npm,
    /// Text-only `list` output
    Yarn,
}

impl PackageManager {
    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// One logical command expressed for each package manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerArgs {
    pub npm: Vec<String>,
    pub yarn: Vec<String>,
}

impl ManagerArgs {
    pub fn for_manager(&self, manager: PackageManager) -> &[String] {
        match manager {
            PackageManager::Npm => &self.npm,
            PackageManager::Yarn => &self.yarn,
        }
    }
}

/// Captured stdout together with the manager that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerOutput {
    pub manager: PackageManager,
    pub stdout: String,
}

/// Package manager front end bound to one project
pub struct JsSystem<'a> {
    context: &'a ExtensionContext,
}

impl<'a> JsSystem<'a> {
    pub fn new(context: &'a ExtensionContext) -> Self {
        Self { context }
    }

    /// Detect the package manager for the project root
    pub async fn package_manager(&self) -> PackageManager {
        match self.context.settings().package_manager {
            PackageManagerPreference::Npm => PackageManager::Npm,
            PackageManagerPreference::Yarn => PackageManager::Yarn,
            PackageManagerPreference::Auto => {
                let has_lockfile = self.context.root().join(YARN_LOCKFILE).exists();
                if has_lockfile && self.yarn_available().await {
                    PackageManager::Yarn
                } else {
                    PackageManager::Npm
                }
            }
        }
    }

    async fn yarn_available(&self) -> bool {
        let invocation = Invocation::new(PackageManager::Yarn.program()).arg("-v");
        self.context
            .run(&invocation)
            .await
            .is_ok_and(|output| output.success())
    }

    /// Run the command with the detected manager in the project root.
    ///
    /// Spawn failures, timeouts and non-zero exits are all errors; there is no retry.
    pub async fn call(&self, args: &ManagerArgs) -> Result<ManagerOutput, ProcessError> {
        let manager = self.package_manager().await;
        let invocation = Invocation::new(manager.program())
            .args(args.for_manager(manager).iter().cloned())
            .current_dir(self.context.root())
            .timeout(self.context.settings().list_timeout);
        debug!(%manager, command = %invocation.command_line(), "invoking package manager");

        let output = self.context.run(&invocation).await?.into_success(&invocation)?;
        Ok(ManagerOutput {
            manager,
            stdout: output.stdout,
        })
    }
}
