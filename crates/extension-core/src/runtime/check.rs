//! Host prerequisite checks run before scaffolding

use super::version::{meets_minimum, parse_version};
use crate::context::ExtensionContext;
use crate::process::Invocation;
use std::fmt;
use tracing::{debug, warn};

/// Runtime detection result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

/// Check if Node.js is available
pub async fn check_node(context: &ExtensionContext) -> RuntimeInfo {
    let invocation = Invocation::new("node").arg("--version");

    match context.run(&invocation).await {
        Ok(out) if out.success() => RuntimeInfo {
            name: "Node.js",
            version: Some(out.stdout.trim().to_string()),
            available: true,
        },
        other => {
            debug!(result = ?other, "node probe failed");
            RuntimeInfo {
                name: "Node.js",
                version: None,
                available: false,
            }
        }
    }
}

/// A dependency check that did not pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFailure {
    /// What was required, from [`DependencyCheck::describe`]
    pub check: String,
    /// What was found instead
    pub reason: String,
}

impl CheckFailure {
    pub fn new(check: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.check, self.reason)
    }
}

/// Pass/fail predicate over the host environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyCheck {
    /// Node.js at `min_major.min_minor` or newer
    NodeInstalled { min_major: u64, min_minor: u64 },
}

impl DependencyCheck {
    pub fn node_installed(min_major: u64, min_minor: u64) -> Self {
        Self::NodeInstalled {
            min_major,
            min_minor,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::NodeInstalled {
                min_major,
                min_minor,
            } => format!("Node.js {}.{} or newer", min_major, min_minor),
        }
    }

    pub async fn check(&self, context: &ExtensionContext) -> bool {
        self.evaluate(context).await.is_ok()
    }

    /// Like [`check`](Self::check), explaining what was found on failure
    pub async fn evaluate(&self, context: &ExtensionContext) -> Result<(), CheckFailure> {
        let result = match self {
            Self::NodeInstalled {
                min_major,
                min_minor,
            } => self.evaluate_node(context, *min_major, *min_minor).await,
        };
        if let Err(failure) = &result {
            warn!(check = %failure.check, reason = %failure.reason, "dependency check failed");
        }
        result
    }

    async fn evaluate_node(
        &self,
        context: &ExtensionContext,
        min_major: u64,
        min_minor: u64,
    ) -> Result<(), CheckFailure> {
        let node = check_node(context).await;
        let Some(raw) = node.version.filter(|_| node.available) else {
            return Err(CheckFailure::new(
                self.describe(),
                "Node.js is not installed (install from https://nodejs.org)",
            ));
        };

        let version = parse_version(&raw).map_err(|e| {
            CheckFailure::new(
                self.describe(),
                format!("could not read Node.js version '{}': {}", raw, e),
            )
        })?;

        if meets_minimum(&version, min_major, min_minor) {
            debug!(version = %version, "node version accepted");
            Ok(())
        } else {
            Err(CheckFailure::new(self.describe(), format!("found {}", raw)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::process::fake::{self, FakeRunner};
    use std::sync::Arc;

    fn context_with_node(reply: &'static str) -> ExtensionContext {
        let runner = FakeRunner::new(move |_| fake::ok(reply));
        ExtensionContext::with_runner("/project", Arc::new(runner), Settings::default())
    }

    #[test]
    fn test_describe_names_minimum_version() {
        assert_eq!(
            DependencyCheck::node_installed(10, 16).describe(),
            "Node.js 10.16 or newer"
        );
    }

    #[tokio::test]
    async fn test_node_check_passes_on_newer_version() {
        let ctx = context_with_node("v14.17.0\n");
        assert!(DependencyCheck::node_installed(10, 16).check(&ctx).await);
    }

    #[tokio::test]
    async fn test_node_check_fails_on_older_version() {
        let ctx = context_with_node("v10.15.3\n");
        let failure = DependencyCheck::node_installed(10, 16)
            .evaluate(&ctx)
            .await
            .unwrap_err();
        assert_eq!(failure.check, "Node.js 10.16 or newer");
        assert_eq!(failure.reason, "found v10.15.3");
    }

    #[tokio::test]
    async fn test_node_check_fails_when_not_installed() {
        let runner = FakeRunner::new(fake::not_found);
        let ctx = ExtensionContext::with_runner("/project", Arc::new(runner), Settings::default());

        let node = check_node(&ctx).await;
        assert!(!node.available);
        assert!(!DependencyCheck::node_installed(10, 16).check(&ctx).await);
    }

    #[tokio::test]
    async fn test_node_check_fails_on_unparseable_output() {
        let ctx = context_with_node("ten point sixteen");
        let failure = DependencyCheck::node_installed(10, 16)
            .evaluate(&ctx)
            .await
            .unwrap_err();
        assert!(failure.reason.contains("could not read Node.js version"));
    }
}
