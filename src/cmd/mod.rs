use clap::{Parser, Subcommand};
use standard_error::{Interpolate, StandardError};

use crate::{conf::Settings, pkg::server::listen, prelude::Result};

mod migrate;
mod seed;

#[derive(Parser)]
#[command(about = "job board api")]
struct Cmd {
    #[command(subcommand)]
    command: Option<SubCommandType>,
}

#[derive(Subcommand)]
enum SubCommandType {
    /// Serve the http api
    Listen,
    /// Apply database migrations
    Migrate,
    /// Replace all jobs with the sample set
    Seed,
}

pub async fn run() -> Result<()> {
    let args = Cmd::parse();
    let settings = Settings::new()
        .map_err(|e| StandardError::new("ERR-CONF-000").interpolate_err(e.to_string()))?;
    match args.command {
        Some(SubCommandType::Listen) => {
            listen(&settings).await?;
        }
        Some(SubCommandType::Migrate) => {
            migrate::apply(&settings).await?;
        }
        Some(SubCommandType::Seed) => {
            seed::apply(&settings).await?;
        }
        None => {
            tracing::error!("no subcommand passed");
        }
    }
    Ok(())
}
