//! nestkit CLI tool

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nestkit::{observability, GenerateServiceCommand, NestkitConfig};

#[derive(Parser)]
#[command(name = "nestkit")]
#[command(version)]
#[command(about = "Interactive service generator for NestJS projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a service with its own database connection
    GenerateService,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    observability::init().context("Failed to initialize logging")?;
    let config = NestkitConfig::load().context("Failed to load configuration")?;

    match cli.command {
        Commands::GenerateService => {
            GenerateServiceCommand::new(config).execute().await?;
        }
    }

    Ok(())
}
