//! `paw-cli`: operator tools for a Paw Paradise deployment.
//!
//! ```bash
//! # Create the users/orders schema and the session table
//! paw-cli migrate
//!
//! # Validate a catalog file before the storefront picks it up
//! paw-cli catalog check crates/storefront/catalog/products.json
//! ```
//!
//! Logging follows `RUST_LOG` (default `info`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "paw-cli", author, version, about = "Paw Paradise CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply storefront migrations and create the session table
    Migrate,
    /// Product catalog files
    #[command(subcommand)]
    Catalog(CatalogCommand),
}

#[derive(Subcommand)]
enum CatalogCommand {
    /// Parse a catalog file and print a summary
    Check {
        /// Catalog JSON (the storefront's default location if omitted)
        #[arg(default_value = "crates/storefront/catalog/products.json")]
        path: PathBuf,
    },
}

impl Command {
    async fn run(self) -> Result<(), Box<dyn Error>> {
        match self {
            Self::Migrate => commands::migrate::storefront().await?,
            Self::Catalog(CatalogCommand::Check { path }) => {
                commands::catalog::check(&path).await?;
            }
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    match Cli::parse().command.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}
