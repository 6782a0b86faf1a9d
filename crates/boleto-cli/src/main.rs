//! CLI application for Brazilian payment slips.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{banks, batch, config, decode, encode};

/// Boleto - encode payment slips into barcodes and typeable lines
#[derive(Parser)]
#[command(name = "boleto")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a single slip file
    Encode(encode::EncodeArgs),

    /// Encode multiple slip files
    Batch(batch::BatchArgs),

    /// Validate and decode a barcode or typeable line
    Decode(decode::DecodeArgs),

    /// List supported banks
    Banks,

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Encode(args) => encode::run(args, config_path),
        Commands::Batch(args) => batch::run(args, config_path),
        Commands::Decode(args) => decode::run(args),
        Commands::Banks => banks::run(config_path),
        Commands::Config(args) => config::run(args, config_path),
    }
}
