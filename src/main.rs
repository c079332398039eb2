//! copycat - structural similarity detection for code submissions

mod shape_cli;
mod twins_cli;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "copycat")]
#[command(about = "Structural similarity detection for code submissions", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Similar submission detection
    #[command(subcommand)]
    Twins(twins_cli::TwinsCommands),
    /// Structural tokens of a single file
    #[command(subcommand)]
    Shape(shape_cli::ShapeCommands),
}

fn main() -> anyhow::Result<()> {
    // stdout 留给 JSON 输出
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Twins(cmd) => twins_cli::run(cmd)?,
        Commands::Shape(cmd) => shape_cli::run(cmd)?,
    }

    Ok(())
}
