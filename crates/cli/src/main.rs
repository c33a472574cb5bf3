//! Intexta CLI
//!
//! Main entry point for the intexta command-line tool.
//! Assembles bounded document context, filters tabular inventories and
//! answers questions over either one.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, AssembleCommand, FilterCommand};
use intexta_core::logging::{self, LogFormat};
use intexta_core::{config::AppConfig, AppResult};
use std::path::PathBuf;

/// Intexta - bounded context assembly and query filtering
#[derive(Parser, Debug)]
#[command(name = "intexta")]
#[command(about = "Bounded context assembly and query filtering", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "INTEXTA_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "INTEXTA_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Generation provider (deepseek, openai, ollama)
    #[arg(short, long, global = true, env = "INTEXTA_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "INTEXTA_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble bounded context from a directory of documents
    Assemble(AssembleCommand),

    /// Filter a CSV inventory with a free-text query
    Filter(FilterCommand),

    /// Answer a question from documents or an inventory
    Ask(AskCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    let config = AppConfig::load()?;

    let mut config = config.with_overrides(
        cli.workspace,
        cli.config,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );
    if let Some(log_format) = cli.log_format {
        config.log_format = log_format;
    }

    logging::init_logging(
        config.log_level.as_deref(),
        config.no_color,
        LogFormat::parse(&config.log_format),
    )?;

    tracing::info!("Intexta CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    config.validate()?;

    let command_name = match &cli.command {
        Commands::Assemble(_) => "assemble",
        Commands::Filter(_) => "filter",
        Commands::Ask(_) => "ask",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Assemble(cmd) => cmd.execute(&config).await,
        Commands::Filter(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
