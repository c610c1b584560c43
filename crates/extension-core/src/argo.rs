//! Argo extension variants
//!
//! An [`Argo`] binds a template setup to the renderer package its extensions
//! are built against. The two known variants, [`Argo::admin`] and
//! [`Argo::checkout`], are built once per process on first use.

use crate::context::ExtensionContext;
use crate::error::{ExtensionError, Result};
use crate::renderer::RendererPackage;
use crate::runtime::check::DependencyCheck;
use crate::script;
use crate::setup::TemplateSetup;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info};
use url::Url;

pub const GIT_ADMIN_TEMPLATE: &str = "https://github.com/Shopify/argo-admin-template.git";
pub const GIT_CHECKOUT_TEMPLATE: &str = "https://github.com/Shopify/argo-checkout-template.git";

static ADMIN: LazyLock<Argo> = LazyLock::new(|| Argo {
    setup: TemplateSetup::new(template_url(GIT_ADMIN_TEMPLATE)),
    renderer_package: RendererPackage::admin(),
});

static CHECKOUT: LazyLock<Argo> = LazyLock::new(|| Argo {
    setup: TemplateSetup::new(template_url(GIT_CHECKOUT_TEMPLATE))
        .with_dependency_checks(vec![DependencyCheck::node_installed(10, 16)]),
    renderer_package: RendererPackage::checkout(),
});

fn template_url(url: &str) -> Url {
    Url::parse(url).expect("built-in template URL is valid")
}

/// Payload handed to the packaging service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigBundle {
    pub renderer_version: String,
    /// Standard base64 of the built script
    pub serialized_script: String,
}

/// A kind of Argo extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argo {
    setup: TemplateSetup,
    renderer_package: RendererPackage,
}

impl Argo {
    pub fn new(setup: TemplateSetup, renderer_package: RendererPackage) -> Result<Self> {
        if renderer_package.name().trim().is_empty() {
            return Err(ExtensionError::InvalidRendererPackage);
        }
        Ok(Self {
            setup,
            renderer_package,
        })
    }

    /// Admin extensions (no host prerequisites)
    pub fn admin() -> &'static Argo {
        &ADMIN
    }

    /// Checkout extensions (requires Node.js 10.16+)
    pub fn checkout() -> &'static Argo {
        &CHECKOUT
    }

    pub fn setup(&self) -> &TemplateSetup {
        &self.setup
    }

    pub fn renderer_package(&self) -> &RendererPackage {
        &self.renderer_package
    }

    /// Scaffold a new extension into `directory`
    pub async fn create(
        &self,
        directory: &Path,
        identifier: &str,
        context: &ExtensionContext,
    ) -> Result<()> {
        self.setup.call(directory, identifier, context).await
    }

    /// Build the config bundle for the project at the context root.
    ///
    /// The script is located before the package manager runs so a missing
    /// build fails without spawning anything.
    pub async fn config(&self, context: &ExtensionContext) -> Result<ConfigBundle> {
        let path = script::locate(context.root())?;
        let renderer_version = self.renderer_package.extract_version(context).await?;
        let serialized_script = script::serialize(&path).await.map_err(|source| {
            debug!(error = %source, "script preparation failed");
            ExtensionError::ScriptReadOrEncodeFailed { source }
        })?;

        info!(
            renderer = self.renderer_package.name(),
            %renderer_version,
            encoded_bytes = serialized_script.len(),
            "config bundle ready"
        );
        Ok(ConfigBundle {
            renderer_version,
            serialized_script,
        })
    }
}

/// Extension types selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ExtensionType {
    Admin,
    Checkout,
}

impl ExtensionType {
    pub fn argo(&self) -> &'static Argo {
        match self {
            ExtensionType::Admin => Argo::admin(),
            ExtensionType::Checkout => Argo::checkout(),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ExtensionType::Admin => "Admin",
            ExtensionType::Checkout => "Checkout",
        }
    }
}

impl fmt::Display for ExtensionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
