//! Settings with environment variable overrides

use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Environment variable overriding the package manager list timeout (seconds)
pub const LIST_TIMEOUT_ENV: &str = "EXTENSION_LIST_TIMEOUT_SECS";

/// Environment variable overriding the template clone timeout (seconds)
pub const CLONE_TIMEOUT_ENV: &str = "EXTENSION_CLONE_TIMEOUT_SECS";

/// Environment variable forcing a package manager (`auto`, `npm`, `yarn`)
pub const PACKAGE_MANAGER_ENV: &str = "EXTENSION_PACKAGE_MANAGER";

const DEFAULT_LIST_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_CLONE_TIMEOUT: Duration = Duration::from_secs(300);

/// Which package manager to query for installed dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackageManagerPreference {
    /// Yarn when the project has a yarn.lock and yarn is installed, npm otherwise
    #[default]
    Auto,
    Npm,
    Yarn,
}

#[derive(Debug, Error)]
#[error("unknown package manager '{0}' (expected auto, npm or yarn)")]
pub struct UnknownPackageManager(pub String);

impl FromStr for PackageManagerPreference {
    type Err = UnknownPackageManager;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "npm" => Ok(Self::Npm),
            "yarn" => Ok(Self::Yarn),
            _ => Err(UnknownPackageManager(s.to_string())),
        }
    }
}

impl fmt::Display for PackageManagerPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Npm => "npm",
            Self::Yarn => "yarn",
        };
        f.write_str(name)
    }
}

/// Tunables shared by every command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Upper bound for the package manager `list` call
    pub list_timeout: Duration,
    /// Upper bound for cloning a template repository
    pub clone_timeout: Duration,
    pub package_manager: PackageManagerPreference,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            list_timeout: DEFAULT_LIST_TIMEOUT,
            clone_timeout: DEFAULT_CLONE_TIMEOUT,
            package_manager: PackageManagerPreference::Auto,
        }
    }
}

impl Settings {
    /// Defaults overridden by the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup`. Invalid values are ignored with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(timeout) = lookup_secs(&lookup, LIST_TIMEOUT_ENV) {
            settings.list_timeout = timeout;
        }
        if let Some(timeout) = lookup_secs(&lookup, CLONE_TIMEOUT_ENV) {
            settings.clone_timeout = timeout;
        }
        if let Some(value) = lookup(PACKAGE_MANAGER_ENV) {
            match value.parse() {
                Ok(preference) => settings.package_manager = preference,
                Err(e) => warn!(variable = PACKAGE_MANAGER_ENV, "{}", e),
            }
        }

        settings
    }

    pub fn with_package_manager(mut self, preference: PackageManagerPreference) -> Self {
        self.package_manager = preference;
        self
    }
}

fn lookup_secs<F>(lookup: &F, variable: &str) -> Option<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(variable)?;
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => {
            warn!(variable, value = %value, "ignoring invalid timeout");
            None
        }
    }
}
