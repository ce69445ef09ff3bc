//! # Asset Registry Node
//!
//! Operator entry point for the asset registry.
//!
//! Each invocation opens the file-backed ledger, runs exactly one operation
//! in its own transaction, prints the response and exits. A failed
//! operation leaves the ledger untouched and exits non-zero.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, then environment, then flags)
//! 2. Initialize logging
//! 3. Open and lock the ledger
//! 4. Dispatch the operation

mod config;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use asset_registry::adapters::FileLedger;
use asset_registry::dispatch::{Response, OPERATION_REGISTRY};
use asset_registry::domain::config::EnrollScan;
use asset_registry::{Dispatcher, RegistryService};

use crate::config::NodeConfig;

/// Asset ownership registry over a file-backed ledger
#[derive(Parser, Debug)]
#[command(name = "asset-registry", version)]
#[command(about = "Run asset registry operations against a local ledger")]
struct Args {
    /// Ledger data directory [env: REGISTRY_LEDGER_PATH]
    #[arg(short, long)]
    ledger_path: Option<PathBuf>,

    /// Enroll history narrowing: repeat-asset-id or placeholder [env: REGISTRY_ENROLL_SCAN]
    #[arg(long)]
    enroll_scan: Option<EnrollScan>,

    /// Maximum assets one user may own [env: REGISTRY_MAX_OWNED_ASSETS]
    #[arg(long)]
    max_owned_assets: Option<usize>,

    /// Print the response as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one operation in its own transaction
    Invoke {
        /// Operation name (see `operations`)
        operation: String,
        /// Positional operation arguments
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List supported operations
    Operations,
}

impl Args {
    /// Command-line flags take precedence over the environment.
    fn apply(&self, config: &mut NodeConfig) {
        if let Some(path) = &self.ledger_path {
            config.ledger_path.clone_from(path);
        }
        if let Some(mode) = self.enroll_scan {
            config.registry.enroll_scan = mode;
        }
        if let Some(max) = self.max_owned_assets {
            config.registry.max_owned_assets = Some(max);
        }
    }
}

fn init_tracing(filter: &str) -> Result<()> {
    let filter = EnvFilter::try_new(filter).context("invalid log filter")?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Open the ledger and run one operation in a transaction.
fn invoke(config: &NodeConfig, operation: &str, args: &[String]) -> Result<Response> {
    let ledger = FileLedger::open(&config.ledger_path).with_context(|| {
        format!("failed to open ledger at {}", config.ledger_path.display())
    })?;
    info!(
        path = %config.ledger_path.display(),
        height = ledger.height(),
        "ledger ready"
    );

    let service = RegistryService::new(config.registry.clone())?;
    let dispatcher = Dispatcher::new(service);
    Ok(dispatcher.invoke_in_transaction(&ledger, operation, args))
}

/// Print `response`: the payload on `out`, or the error on `err`.
fn render(response: &Response, json: bool, out: &mut impl Write, err: &mut impl Write) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string(response)?)?;
        return Ok(());
    }
    match response {
        Response::Success(payload) if payload.is_empty() => {}
        Response::Success(payload) => writeln!(out, "{}", String::from_utf8_lossy(payload))?,
        Response::Error { code, message } => writeln!(err, "Error [{code}]: {message}")?,
    }
    Ok(())
}

fn exit_code(response: &Response) -> ExitCode {
    if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_operations(out: &mut impl Write) -> std::io::Result<()> {
    let mut operations: Vec<_> = OPERATION_REGISTRY.iter().collect();
    operations.sort_by_key(|(name, _)| **name);
    for (name, info) in operations {
        let kind = if info.is_write { "write" } else { "read" };
        writeln!(out, "{name:<20} {kind:<6} {:<50} {}", info.usage, info.description)?;
    }
    Ok(())
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let mut config = NodeConfig::from_env()?;
    args.apply(&mut config);
    config.validate()?;

    init_tracing(&config.log_filter)?;

    match &args.command {
        Command::Operations => {
            print_operations(&mut std::io::stdout().lock())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Invoke {
            operation,
            args: operation_args,
        } => {
            let response = invoke(&config, operation, operation_args)?;
            render(
                &response,
                args.json,
                &mut std::io::stdout().lock(),
                &mut std::io::stderr().lock(),
            )?;
            Ok(exit_code(&response))
        }
    }
}
