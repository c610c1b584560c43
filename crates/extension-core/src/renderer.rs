//! Renderer package identity and installed-version extraction
//!
//! The renderer package is queried through the project's package manager.
//! npm answers `list --json` with a dependency tree; yarn only prints text
//! such as:
//!
//! ```text
//! yarn list v1.22.4
//! ├─ @shopify/argo-checkout-react@0.3.4
//! └─ @shopify/argo-checkout@0.3.4
//! ✨  Done in 0.42s.
//! ```
//!
//! Each [`RendererPackage`] variant owns the parser for the format its
//! extension type is expected to produce.

use crate::context::ExtensionContext;
use crate::error::{ExtensionError, Result};
use crate::runtime::js_system::{JsSystem, ManagerArgs};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info};

pub const ADMIN_RENDERER_PACKAGE: &str = "@shopify/argo-admin";
pub const CHECKOUT_RENDERER_PACKAGE: &str = "@shopify/argo-checkout";

static PLAIN_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+$").unwrap());

/// Renderer library an extension type depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererPackage {
    /// Version read from npm's JSON dependency tree
    Admin(String),
    /// Version read from yarn's text listing
    Checkout(String),
}

impl RendererPackage {
    pub fn admin() -> Self {
        Self::Admin(ADMIN_RENDERER_PACKAGE.to_string())
    }

    pub fn checkout() -> Self {
        Self::Checkout(CHECKOUT_RENDERER_PACKAGE.to_string())
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Admin(name) | Self::Checkout(name) => name,
        }
    }

    /// Arguments listing this package with either manager
    pub fn list_args(&self) -> ManagerArgs {
        let name = self.name().to_string();
        ManagerArgs {
            npm: vec![
                "list".into(),
                name.clone(),
                "--json".into(),
                "--prod=true".into(),
                "--depth=0".into(),
            ],
            yarn: vec!["list".into(), "--pattern".into(), name],
        }
    }

    /// Parse a `major.minor.patch` version out of package manager output
    pub fn parse_version(&self, output: &str) -> Option<String> {
        match self {
            Self::Admin(name) => parse_npm_json(name, output),
            Self::Checkout(name) => parse_yarn_list(name, output),
        }
    }

    /// Query the package manager and return the installed version.
    ///
    /// A missing or malformed version is [`ExtensionError::VersionNotFound`].
    pub async fn extract_version(&self, context: &ExtensionContext) -> Result<String> {
        let output = JsSystem::new(context)
            .call(&self.list_args())
            .await
            .map_err(|source| ExtensionError::RendererProcessError {
                package: self.name().to_string(),
                source,
            })?;

        debug!(
            package = self.name(),
            manager = %output.manager,
            bytes = output.stdout.len(),
            "parsing package list"
        );

        let version = self
            .parse_version(&output.stdout)
            .ok_or_else(|| ExtensionError::VersionNotFound {
                package: self.name().to_string(),
            })?;
        info!(package = self.name(), %version, "resolved renderer version");
        Ok(version)
    }
}

/// `dependencies.<package>.version` from `npm list --json`
fn parse_npm_json(package: &str, output: &str) -> Option<String> {
    let tree: serde_json::Value = match serde_json::from_str(output) {
        Ok(tree) => tree,
        Err(e) => {
            debug!(error = %e, "package list is not JSON");
            return None;
        }
    };

    let version = tree
        .get("dependencies")?
        .get(package)?
        .get("version")?
        .as_str()?;
    PLAIN_VERSION.is_match(version).then(|| version.to_string())
}

/// Version of the shallowest `<package>@` entry in a `yarn list` listing.
///
/// Depth is the width of the tree prefix before the entry. Equally shallow
/// entries resolve to the first one listed.
fn parse_yarn_list(package: &str, output: &str) -> Option<String> {
    let needle = format!("{}@", package);
    output
        .lines()
        .filter_map(|line| {
            line.match_indices(&needle)
                .filter(|(start, _)| is_entry_start(line, *start))
                .find_map(|(start, _)| {
                    let token = line[start + needle.len()..].split_whitespace().next()?;
                    let depth = line[..start].chars().count();
                    PLAIN_VERSION.is_match(token).then_some((depth, token))
                })
        })
        .min_by_key(|(depth, _)| *depth)
        .map(|(_, token)| token.to_string())
}

/// The match must not be the tail of a longer name (`other-pkg@` for `pkg@`)
fn is_entry_start(line: &str, start: usize) -> bool {
    line[..start].chars().next_back().map_or(true, |c| {
        !(c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | '@'))
    })
}
