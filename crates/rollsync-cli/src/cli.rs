use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rollsync_types::DocumentKind;

#[derive(Parser)]
#[command(
    name = "rollsync",
    about = "Offline-first attendance sync backend",
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

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the data directory layout
    Init(InitArgs),
    /// Start the sync server
    Serve(ServeArgs),
    /// Merge two document files and print the result
    Merge(MergeArgs),
    /// Print a stored document
    Show(ShowArgs),
    /// List stored documents
    List(ListArgs),
}

#[derive(Args)]
pub struct DataDirArg {
    /// Data directory holding the JSON documents
    #[arg(long, default_value = "./data")]
    pub data_dir: PathBuf,
}

#[derive(Args)]
pub struct InitArgs {
    #[command(flatten)]
    pub dir: DataDirArg,
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML config file; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct MergeArgs {
    /// Document kind: settings, workers, areas, activities, groups or attendance/YYYY-MM
    pub kind: DocumentKind,
    pub local: PathBuf,
    pub remote: PathBuf,
}

#[derive(Args)]
pub struct ShowArgs {
    pub kind: DocumentKind,
    #[command(flatten)]
    pub dir: DataDirArg,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub dir: DataDirArg,
}
