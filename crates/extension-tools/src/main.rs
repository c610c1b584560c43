//! Extension CLI - scaffolding and packaging for Argo UI extensions

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use extension_core::tui::{ConfigArgs, CreateArgs};
use extension_core::{Argo, ExtensionContext, ExtensionType, PackageManagerPreference, Settings};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "extension-tools")]
#[command(about = "CLI for scaffolding and packaging Argo UI extensions")]
#[command(version)]
pub struct Args {
    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Package manager to query: auto, npm or yarn
    #[arg(long = "package-manager", global = true)]
    pub package_manager: Option<PackageManagerPreference>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new extension from its template repository
    Create(CliCreateArgs),
    /// Build the config bundle for a built extension
    Config(CliConfigArgs),
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Extension type to scaffold
    #[arg(short = 't', long = "type", value_enum)]
    pub extension_type: ExtensionType,

    /// Directory to create the extension in
    #[arg(short, long)]
    pub directory: PathBuf,

    /// Extension identifier (defaults to the upper-cased type)
    #[arg(short, long)]
    pub identifier: Option<String>,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            extension_type: args.extension_type,
            directory: args.directory,
            identifier: args.identifier,
        }
    }
}

#[derive(Parser, Debug)]
pub struct CliConfigArgs {
    /// Extension type of the project
    #[arg(short = 't', long = "type", value_enum)]
    pub extension_type: ExtensionType,

    /// Project root (defaults to the current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Print the bundle as JSON on stdout instead of a summary
    #[arg(long)]
    pub json: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

/// Non-interactive config path: bundle JSON on stdout, errors returned to `main`
async fn print_bundle(argo: &Argo, context: &ExtensionContext) -> Result<()> {
    let bundle = argo.config(context).await?;
    println!("{}", serde_json::to_string_pretty(&bundle)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_logging(args.verbose);

    let mut settings = Settings::from_env();
    if let Some(preference) = args.package_manager {
        settings = settings.with_package_manager(preference);
    }
    debug!(?settings, "resolved settings");

    let result = match args.command {
        Command::Create(create_args) => {
            extension_core::tui::run_create(create_args.into(), settings).await
        }
        Command::Config(config_args) => {
            let root = match config_args.root {
                Some(root) => root,
                None => std::env::current_dir()?,
            };

            if config_args.json {
                let context = ExtensionContext::new(&root, settings);
                print_bundle(config_args.extension_type.argo(), &context).await
            } else {
                let args = ConfigArgs {
                    extension_type: config_args.extension_type,
                    root,
                };
                extension_core::tui::run_config(args, settings).await
            }
        }
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    if let Err(e) = &result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
    Ok(())
}
