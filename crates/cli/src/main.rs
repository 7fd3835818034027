//! Pod Resources CLI
//!
//! Collects the CPU and memory requests and limits of every container in the
//! cluster, normalizes them to milli-cores and Mi, and writes a CSV report.

mod commands;
mod output;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{normalize, report};

/// Pod Resources CLI
#[derive(Parser)]
#[command(name = "pod-resources")]
#[command(author, version, about = "Report container resource requests and limits as CSV", long_about = None)]
pub struct Cli {
    /// Path to kubeconfig file (also prefixes the default report name)
    #[arg(long, env = "KUBECONFIG", global = true)]
    pub kubeconfig: Option<String>,

    /// Settings file (TOML, YAML or JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the resource report (default)
    Report(ReportArgs),

    /// Normalize a single quantity
    Normalize {
        /// Resource kind
        #[arg(value_enum)]
        kind: QuantityKind,

        /// Quantity, e.g. 250m or 512Mi
        value: String,
    },
}

/// Options of the report command
#[derive(Args, Default)]
pub struct ReportArgs {
    /// Where to read pod specifications from
    #[arg(long, value_enum)]
    pub source: Option<SourceArg>,

    /// Read a saved `kubectl get pods -o json` document instead ("-" for stdin)
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// Restrict the report to one namespace
    #[arg(long, short)]
    pub namespace: Option<String>,

    /// Output file path
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// kubectl program to run
    #[arg(long)]
    pub kubectl: Option<String>,

    /// Also print the report on stdout
    #[arg(long, value_enum)]
    pub show: Option<output::ShowFormat>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SourceArg {
    /// Run kubectl
    Kubectl,
    /// Query the Kubernetes API
    Api,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum QuantityKind {
    /// CPU, normalized to milli-cores
    Cpu,
    /// Memory, normalized to Mi
    Memory,
}

fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_json);

    match cli.command {
        Some(Commands::Normalize { kind, value }) => normalize::run(kind, &value),
        Some(Commands::Report(args)) => {
            report::run(args, cli.kubeconfig, cli.config.as_deref()).await
        }
        None => report::run(ReportArgs::default(), cli.kubeconfig, cli.config.as_deref()).await,
    }
}
