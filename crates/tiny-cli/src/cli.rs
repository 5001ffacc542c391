use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tinymerge",
    about = "Merge multi-namespace tiny v1 mapping files",
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
    /// Merge two mapping files into one with the union of their namespaces
    Merge(MergeArgs),
    /// Parse a mapping file and summarize its contents
    Check(CheckArgs),
}

#[derive(Args)]
pub struct MergeArgs {
    pub input_a: PathBuf,
    pub input_b: PathBuf,
    pub output: PathBuf,
    /// Namespaces consulted, in order, when a name is missing
    pub fallback_order: Vec<String>,
    /// TOML file providing a base `fallback_order`
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct CheckArgs {
    pub input: PathBuf,
}
