//! Pantry CLI - Database migrations and stock management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the pantry schema and the session table
//! pantry-cli migrate
//!
//! # Add one unit of each item (duplicates add more)
//! pantry-cli stock add Apple Milk Apple
//!
//! # Show current stock
//! pantry-cli stock list
//!
//! # Show the 20 most recent log entries
//! pantry-cli log --limit 20
//! ```
//!
//! The database is configured the same way as the web server; see
//! `pantry_web::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pantry-cli")]
#[command(author, version, about = "Pantry CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage store stock
    Stock {
        #[command(subcommand)]
        action: StockAction,
    },
    /// Show the inventory action log, newest first
    Log {
        /// Maximum number of entries to show
        #[arg(short, long)]
        limit: Option<i64>,
    },
}

#[derive(Subcommand)]
enum StockAction {
    /// Add one unit per item name, five names per batch
    Add {
        /// Item names
        #[arg(required = true)]
        items: Vec<String>,
    },
    /// List every item and its quantity
    List,
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

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Stock { action } => match action {
            StockAction::Add { items } => commands::stock::add(&items).await?,
            StockAction::List => commands::stock::list().await?,
        },
        Commands::Log { limit } => commands::log::show(limit).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_stock_add_requires_items() {
        assert!(Cli::try_parse_from(["pantry-cli", "stock", "add"]).is_err());
    }

    #[test]
    fn test_log_limit() {
        let cli = Cli::try_parse_from(["pantry-cli", "log", "--limit", "5"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Log { limit: Some(5) })
        ));
    }
}
