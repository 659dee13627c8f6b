use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "clubdoc", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fill both membership templates for one player and merge them into a PDF
    Generate(GenerateArgs),
    /// Print the effective generator configuration as JSON
    ShowConfig(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Player record as JSON: a 20-column array or an object keyed by field
    #[arg(long)]
    pub record: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// JSON config file; unset keys keep their defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding the two membership templates
    #[arg(long)]
    pub templates: Option<PathBuf>,

    /// Directory the merged PDF is written to
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Office converter executable
    #[arg(long)]
    pub converter: Option<PathBuf>,
}
