//! Tinta CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! tinta migrate
//!
//! # Seed the catalog and default settings from a YAML file
//! tinta seed -f demos/catalog.yaml
//!
//! # Grant or revoke the admin flag on a customer
//! tinta admin grant -i 6d2f1c3a-8b7e-4f5d-9a1b-2c3d4e5f6a7b
//! tinta admin revoke -i 6d2f1c3a-8b7e-4f5d-9a1b-2c3d4e5f6a7b
//! ```
//!
//! # Environment Variables
//!
//! - `TINTA_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tinta")]
#[command(author, version, about = "Tinta CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the catalog and default settings
    Seed {
        /// Path to a YAML file with products to insert
        #[arg(short, long)]
        file: String,
    },
    /// Manage customer admin access
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Grant the admin flag to a customer
    Grant {
        /// Customer ID (UUID)
        #[arg(short, long)]
        id: String,
    },
    /// Revoke the admin flag from a customer
    Revoke {
        /// Customer ID (UUID)
        #[arg(short, long)]
        id: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file } => commands::seed::run(&file).await?,
        Commands::Admin { action } => match action {
            AdminAction::Grant { id } => commands::admin::set_admin(&id, true).await?,
            AdminAction::Revoke { id } => commands::admin::set_admin(&id, false).await?,
        },
    }
    Ok(())
}
