//! Shelf CLI - guest lists and wishlist sync from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Save a product to the guest wishlist
//! shelf wishlist add gid://shopify/Product/1 --title "Water bottle"
//!
//! # Record a product view
//! shelf recent add gid://shopify/Product/2
//!
//! # Compare up to four products
//! shelf compare toggle gid://shopify/Product/3
//!
//! # Sync the wishlist as soon as the session signs in
//! SHELF_SESSION=... shelf watch --interval 5
//! ```
//!
//! # Environment Variables
//!
//! - `SHELF_PROFILE` - Directory holding the local lists (default `.shelf`)
//! - `SHELF_SERVER` - Storefront base URL (default `http://localhost:3000`)
//! - `SHELF_SESSION` - Storefront session cookie value

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shelf_core::ListKind;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "shelf")]
#[command(author, version, about = "Shelf guest list tools")]
struct Cli {
    /// Directory holding the local lists
    #[arg(long, global = true, env = "SHELF_PROFILE", default_value = ".shelf")]
    profile: PathBuf,

    /// Storefront base URL
    #[arg(
        long,
        global = true,
        env = "SHELF_SERVER",
        default_value = "http://localhost:3000"
    )]
    server: String,

    /// Storefront session cookie value
    #[arg(long, global = true, env = "SHELF_SESSION", hide_env_values = true)]
    session: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the guest wishlist
    Wishlist {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Manage recently viewed products
    Recent {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Manage the comparison list
    Compare {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Poll the login status and sync the wishlist on sign-in
    Watch {
        /// Seconds between login checks
        #[arg(short, long, default_value_t = 5)]
        interval: u64,
    },
}

#[derive(Subcommand)]
pub enum ListAction {
    /// Add a product
    Add {
        /// Product id
        id: String,

        /// Product title
        #[arg(short, long)]
        title: Option<String>,

        /// Product image URL
        #[arg(short, long)]
        image: Option<String>,
    },
    /// Remove a product
    Remove {
        /// Product id
        id: String,
    },
    /// Add a product if absent, remove it if present
    Toggle {
        /// Product id
        id: String,
    },
    /// Print the list
    List,
    /// Empty the list
    Clear,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shelf=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Wishlist { action } => {
            commands::list::run(&cli.profile, ListKind::Wishlist, action)?;
        }
        Commands::Recent { action } => {
            commands::list::run(&cli.profile, ListKind::RecentlyViewed, action)?;
        }
        Commands::Compare { action } => {
            commands::list::run(&cli.profile, ListKind::Comparison, action)?;
        }
        Commands::Watch { interval } => {
            commands::watch::run(&cli.profile, &cli.server, cli.session, interval).await?;
        }
    }
    Ok(())
}
