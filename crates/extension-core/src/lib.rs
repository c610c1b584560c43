//! Extension Core - scaffolding and packaging for Argo UI extensions
//!
//! This library creates new extensions from template repositories and packages
//! built extensions into a config bundle for the deployment service. It is
//! shared by the `extension-tools` binary and any other front end.
//!
//! # Architecture
//!
//! - **Layer 1: Host plumbing** - process runner, package manager detection, runtime checks
//! - **Layer 2: Extension operations** - [`TemplateSetup`], [`RendererPackage`], script encoding
//! - **Layer 3: Variants** - [`Argo::admin`] and [`Argo::checkout`] tying the layers together
//! - **Layer 4: CLI/TUI Interface** - Optional cliclack-based command flows (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based command flows
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use extension_core::{Argo, ExtensionContext, Settings};
//!
//! let context = ExtensionContext::new("path/to/extension", Settings::from_env());
//! let bundle = Argo::checkout().config(&context).await?;
//! println!("{}", serde_json::to_string(&bundle)?);
//! ```

pub mod argo;
pub mod config;
pub mod context;
pub mod error;
pub mod process;
pub mod renderer;
pub mod runtime;
pub mod script;
pub mod setup;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use argo::{Argo, ConfigBundle, ExtensionType};
pub use config::{PackageManagerPreference, Settings};
pub use context::ExtensionContext;
pub use error::{ExtensionError, Result};
pub use process::{CommandRunner, Invocation, SystemRunner};
pub use renderer::RendererPackage;
pub use runtime::{CheckFailure, DependencyCheck, PackageManager};
pub use setup::TemplateSetup;
