use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use exchange_cli::{AppConfig, Command, OutputFormat, execute, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Calculators for 1031 like-kind exchanges.
///
/// Each subcommand validates its inputs, prints the derived figures, and
/// exits non-zero when any input is rejected.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// TOML file overriding the exchange rules and logging defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also append log records to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    let level = logging::effective_level(cli.verbose, config.logging.level.as_deref());
    let log_file = cli.log_file.as_deref().or(config.logging.file.as_deref());
    logging::init_logging(&level, log_file)?;
    debug!(?config, "configuration loaded");

    let output = execute(&cli.command, &config.rules, cli.format)?;

    if output.valid || cli.format == OutputFormat::Json {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(output.rendered.as_bytes())
            .context("failed to write output")?;
    } else {
        eprint!("{}", output.rendered);
    }

    if !output.valid {
        anyhow::bail!("{} rejected its input", cli.command.name());
    }
    Ok(())
}
