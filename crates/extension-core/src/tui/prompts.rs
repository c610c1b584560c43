//! Charm-style command flows using cliclack

use crate::argo::ExtensionType;
use crate::config::Settings;
use crate::context::ExtensionContext;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Arguments for the create command
#[derive(Debug, Clone)]
pub struct CreateArgs {
    /// Which kind of extension to scaffold
    pub extension_type: ExtensionType,

    /// Directory to clone the template into
    pub directory: PathBuf,

    /// Extension identifier recorded with the setup
    pub identifier: Option<String>,
}

/// Arguments for the config command
#[derive(Debug, Clone)]
pub struct ConfigArgs {
    pub extension_type: ExtensionType,

    /// Project root containing build/main.js
    pub root: PathBuf,
}

/// Scaffold a new extension with spinner feedback
pub async fn run_create(args: CreateArgs, settings: Settings) -> Result<()> {
    let argo = args.extension_type.argo();
    cliclack::intro(format!("Create {} extension", args.extension_type))?;

    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let context = ExtensionContext::new(&current_dir, settings);
    let target = context.resolve(&args.directory);
    validate_target(&target)?;

    let identifier = args
        .identifier
        .clone()
        .unwrap_or_else(|| args.extension_type.display_name().to_uppercase());

    let checks: Vec<String> = argo
        .setup()
        .dependency_checks()
        .iter()
        .map(|c| c.describe())
        .collect();
    if !checks.is_empty() {
        cliclack::log::info(format!("Requires: {}", checks.join(", ")))?;
    }

    let spinner = cliclack::spinner();
    spinner.start(format!("Cloning {}...", argo.setup().git_template()));

    match argo.create(&target, &identifier, &context).await {
        Ok(()) => spinner.stop(format!("Created extension in {}", target.display())),
        Err(e) => {
            spinner.stop("Setup failed");
            cliclack::log::error(format!("{}", e))?;
            anyhow::bail!("Extension was not created.");
        }
    }

    print_next_steps(&current_dir, &target)?;
    Ok(())
}

/// Build the config bundle and summarize it
pub async fn run_config(args: ConfigArgs, settings: Settings) -> Result<()> {
    let context = ExtensionContext::new(&args.root, settings);
    package_extension(args.extension_type, &context).await
}

/// Nothing is spawned before `Argo::config` has located the built script
async fn package_extension(
    extension_type: ExtensionType,
    context: &ExtensionContext,
) -> Result<()> {
    let argo = extension_type.argo();
    cliclack::intro(format!("Package {} extension", extension_type))?;
    cliclack::log::info(format!(
        "Project {} (package manager: {})",
        context.root().display(),
        context.settings().package_manager
    ))?;

    let spinner = cliclack::spinner();
    spinner.start("Preparing extension...");

    let bundle = match argo.config(context).await {
        Ok(bundle) => {
            spinner.stop("Extension prepared");
            bundle
        }
        Err(e) => {
            spinner.stop("Packaging failed");
            cliclack::log::error(format!("{}", e))?;
            anyhow::bail!("Extension was not packaged.");
        }
    };

    cliclack::log::success(format!(
        "{} {}",
        argo.renderer_package().name(),
        bundle.renderer_version
    ))?;
    cliclack::log::info(format!(
        "Script encoded ({} base64 characters)",
        bundle.serialized_script.len()
    ))?;
    cliclack::outro("Ready to push")?;

    Ok(())
}

fn validate_target(target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        if !parent.exists() && parent != Path::new("") {
            anyhow::bail!("Parent directory does not exist: {}", parent.display());
        }
    }

    // git refuses to clone into a non-empty directory
    if target.is_dir() {
        let count = std::fs::read_dir(target)?.count();
        if count > 0 {
            anyhow::bail!(
                "Directory {} already has {} existing items",
                target.display(),
                count
            );
        }
    }

    Ok(())
}

fn print_next_steps(current_dir: &Path, target: &Path) -> Result<()> {
    let mut steps = Vec::new();
    if current_dir != target {
        steps.push(format!("cd {}", target.display()));
    }
    steps.push("Install dependencies with npm install or yarn".to_string());
    steps.push("Build the extension so build/main.js exists".to_string());

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::fake::{self, FakeRunner};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_without_build_spawns_nothing() {
        let root = TempDir::new().unwrap();
        std::fs::write(root.path().join("yarn.lock"), "").unwrap();
        let runner = Arc::new(FakeRunner::new(|_| fake::ok("1.22.4")));
        let ctx = ExtensionContext::with_runner(root.path(), runner.clone(), Settings::default());

        let err = package_extension(ExtensionType::Checkout, &ctx)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Extension was not packaged.");
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_validate_target_accepts_new_directory() {
        let root = TempDir::new().unwrap();
        assert!(validate_target(&root.path().join("fresh")).is_ok());
    }

    #[test]
    fn test_validate_target_rejects_non_empty_directory() {
        let root = TempDir::new().unwrap();
        std::fs::write(root.path().join("package.json"), "{}").unwrap();
        let err = validate_target(root.path()).unwrap_err();
        assert!(err.to_string().contains("1 existing items"));
    }

    #[test]
    fn test_validate_target_rejects_missing_parent() {
        let root = TempDir::new().unwrap();
        let err = validate_target(&root.path().join("missing/child")).unwrap_err();
        assert!(err.to_string().contains("Parent directory does not exist"));
    }
}
