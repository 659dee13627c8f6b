use clap::Parser;
use eyre::Result;

mod cli;
mod commands;

fn main() -> Result<()> {
    color_eyre::install()?;

    // stdout carries the JSON result, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    match cli.command {
        cli::Command::Generate(args) => commands::generate(args),
        cli::Command::ShowConfig(args) => commands::show_config(args),
    }
}
