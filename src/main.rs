//! Staplegun - plugin discovery and loading for command-line frameworks.
//!
//! The binary is a thin inspection frontend over the library: it loads
//! a plugin directory (or a whole plugins root) and reports the outcome
//! in text or JSON.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use staplegun::{LoadState, PluginLoader, PluginRegistry};

/// Plugin discovery and loading for command-line frameworks
#[derive(Parser)]
#[command(name = "staplegun")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect a single plugin directory
    Inspect {
        /// Plugin directory to load
        directory: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// List every plugin under a plugins root
    List {
        /// Root directory containing plugin subdirectories
        root: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };
    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    match cli.command {
        Commands::Inspect { directory, format } => inspect(&directory, format),
        Commands::List { root, format } => list(&root, format),
    }
}

/// Load one plugin directory and print the resulting read model.
fn inspect(directory: &str, format: Format) -> Result<ExitCode> {
    let mut loader = PluginLoader::new();
    loader.load_from_directory(directory);

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&loader)?),
        Format::Text => {
            if loader.load_state == LoadState::Ok {
                println!(
                    "Loaded plugin '{}' ({} commands)",
                    loader.namespace.as_deref().unwrap_or(""),
                    loader.commands.len()
                );
                if !loader.defaults.is_empty() {
                    println!("  defaults: {}", serde_json::to_string(&loader.defaults)?);
                }
                for command in &loader.commands {
                    let file = command
                        .file
                        .as_ref()
                        .map(|f| f.display().to_string())
                        .unwrap_or_else(|| "<no script>".to_string());
                    let description = command.description.as_deref().unwrap_or("");
                    println!("  {:<16} {file}  {description}", command.name);
                }
            } else {
                println!("Load failed: {}", loader.error_state);
            }
        }
    }

    Ok(exit_for(loader.load_state))
}

/// Scan a plugins root and print per-plugin status.
fn list(root: &Path, format: Format) -> Result<ExitCode> {
    let registry = PluginRegistry::scan(root)?;

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&registry)?),
        Format::Text => {
            println!(
                "{} plugins found under {} ({} loaded)",
                registry.count(),
                registry.root().display(),
                registry.count_loaded()
            );
            for entry in registry.plugins() {
                let dir_name = entry
                    .directory
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                if entry.is_loaded() {
                    println!(
                        "  ok     {dir_name} -> {}",
                        entry.loader.namespace.as_deref().unwrap_or("")
                    );
                } else {
                    println!("  error  {dir_name} ({})", entry.loader.error_state);
                }
            }
            for (name, command) in registry.commands() {
                let description = command.description.as_deref().unwrap_or("");
                println!("    {name:<24} {description}");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn exit_for(state: LoadState) -> ExitCode {
    if state == LoadState::Ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
