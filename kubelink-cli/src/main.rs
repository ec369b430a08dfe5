//! Kubelink CLI
//!
//! Command-line front end for the Kubelink Kubernetes connector

mod commands;
mod output;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use kubelink_api::{ConnectorConfig, KubeConnector};
use kubelink_common::DataShapeCatalog;

use output::OutputFormat;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Connector configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data shape catalog (TOML)
    #[arg(long, global = true, default_value = "shapes.toml")]
    catalog: PathBuf,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List pods as rows of a data shape
    Pods {
        /// Data shape name from the catalog
        #[arg(short, long)]
        shape: String,
        /// Namespace (defaults to the configured namespace)
        #[arg(short, long)]
        namespace: Option<String>,
    },
    /// List services as rows of a data shape
    Services {
        /// Data shape name from the catalog
        #[arg(short, long)]
        shape: String,
        #[arg(short, long)]
        namespace: Option<String>,
    },
    /// Set the replica count of a deployment
    Scale {
        /// Deployment name
        name: String,
        /// Desired number of replicas
        replicas: String,
        #[arg(short, long)]
        namespace: Option<String>,
    },
    /// Delete a deployment
    Delete {
        /// Deployment name
        name: String,
        #[arg(short, long)]
        namespace: Option<String>,
    },
    /// Create a deployment from a manifest file
    Create {
        /// Deployment name
        name: String,
        /// Manifest path (defaults to the configured manifest path)
        #[arg(short, long)]
        file: Option<PathBuf>,
        #[arg(short, long)]
        namespace: Option<String>,
    },
    /// Show the most recent log lines of a pod
    Logs {
        /// Pod name
        pod: String,
        #[arg(short, long)]
        namespace: Option<String>,
    },
    /// Configuration helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print a sample configuration file with the defaults
    Sample,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Commands that need no connector
    match cli.command {
        Commands::Config {
            command: ConfigCommands::Sample,
        } => {
            print!("{}", ConnectorConfig::generate_sample());
            return Ok(());
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
            return Ok(());
        }
        _ => {}
    }

    let config = ConnectorConfig::load_from(cli.config.as_deref()).context("Failed to load configuration")?;
    let _log_guard = config
        .logging
        .init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let catalog = load_catalog(&cli.catalog)?;
    let connector = KubeConnector::live(config, Arc::new(catalog));

    match cli.command {
        Commands::Pods { shape, namespace } => {
            commands::resources::list_pods(&connector, namespace.as_deref(), &shape, cli.output).await?
        }
        Commands::Services { shape, namespace } => {
            commands::resources::list_services(&connector, namespace.as_deref(), &shape, cli.output)
                .await?
        }
        Commands::Logs { pod, namespace } => {
            commands::resources::pod_logs(&connector, namespace.as_deref(), &pod).await?
        }
        Commands::Scale {
            name,
            replicas,
            namespace,
        } => {
            commands::deployments::scale(&connector, namespace.as_deref(), &name, &replicas, cli.output)
                .await?
        }
        Commands::Delete { name, namespace } => {
            commands::deployments::delete(&connector, namespace.as_deref(), &name, cli.output).await?
        }
        Commands::Create {
            name,
            file,
            namespace,
        } => {
            commands::deployments::create(
                &connector,
                namespace.as_deref(),
                file.as_deref(),
                &name,
                cli.output,
            )
            .await?
        }
        Commands::Config { .. } | Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Load the data shape catalog; a missing file yields an empty catalog
fn load_catalog(path: &Path) -> Result<DataShapeCatalog> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "Data shape catalog not found, no shapes available");
        return Ok(DataShapeCatalog::new());
    }

    DataShapeCatalog::load(path).with_context(|| format!("Failed to load catalog {}", path.display()))
}

/// Generate shell completions
fn generate_completions(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}
