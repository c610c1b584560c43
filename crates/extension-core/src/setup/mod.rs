//! Template setup: prerequisite checks followed by a template clone

pub mod git;

use crate::context::ExtensionContext;
use crate::error::{ExtensionError, Result};
use crate::runtime::check::DependencyCheck;
use std::path::Path;
use tracing::{debug, info};
use url::Url;

pub use git::clone_template;

/// Template repository plus the checks that must pass before cloning it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSetup {
    git_template: Url,
    dependency_checks: Vec<DependencyCheck>,
}

impl TemplateSetup {
    pub fn new(git_template: Url) -> Self {
        Self {
            git_template,
            dependency_checks: Vec::new(),
        }
    }

    pub fn with_dependency_checks(mut self, checks: Vec<DependencyCheck>) -> Self {
        self.dependency_checks = checks;
        self
    }

    pub fn git_template(&self) -> &Url {
        &self.git_template
    }

    pub fn dependency_checks(&self) -> &[DependencyCheck] {
        &self.dependency_checks
    }

    /// Evaluate every check in order, reporting all failures together
    pub async fn verify_dependencies(&self, context: &ExtensionContext) -> Result<()> {
        let mut failures = Vec::new();
        for check in &self.dependency_checks {
            debug!(check = %check.describe(), "evaluating dependency check");
            if let Err(failure) = check.evaluate(context).await {
                failures.push(failure);
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ExtensionError::DependencyCheckFailed { failures })
        }
    }

    /// Verify prerequisites, then clone the template into `target_dir`.
    ///
    /// Relative directories resolve against the context root. Nothing is cloned
    /// unless every check passes.
    pub async fn call(
        &self,
        target_dir: &Path,
        identifier: &str,
        context: &ExtensionContext,
    ) -> Result<()> {
        let target_dir = context.resolve(target_dir);
        info!(
            identifier,
            template = %self.git_template,
            target = %target_dir.display(),
            "setting up extension"
        );

        self.verify_dependencies(context).await?;
        clone_template(&self.git_template, &target_dir, context).await
    }
}
