use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sablon",
    about = "Sablon record service: CRUD over a document store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Exercise every storage operation against the configured namespace
    Check(StoreArgs),
    /// Print the effective configuration as TOML
    Config(StoreArgs),
}

/// Configuration sources shared by every command. Flags override the file.
#[derive(Args, Clone, Debug, Default)]
pub struct StoreArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Store documents as JSON files under this directory instead of in memory
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    #[arg(long)]
    pub database: Option<String>,
    #[arg(long)]
    pub collection: Option<String>,
}

#[derive(Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub store: StoreArgs,
    /// Address to listen on
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,
}
