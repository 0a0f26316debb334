//! Quire CLI - data directory and API key management.
//!
//! # Usage
//!
//! ```bash
//! # Create the data directory with default categories and an API key
//! quire init
//!
//! # Print or replace the API key
//! quire api-key show
//! quire api-key rotate
//!
//! # Categories
//! quire categories list
//! quire categories add "Travel"
//!
//! # Content
//! quire content list
//! ```
//!
//! # Environment Variables
//!
//! - `QUIRE_DATA_DIR` - Data directory shared with the admin and storefront
//!   (default: `data`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quire_store::DataStore;

mod commands;

#[derive(Parser)]
#[command(name = "quire")]
#[command(author, version, about = "Quire CLI tools")]
struct Cli {
    /// Data directory holding the JSON files
    #[arg(long, global = true, env = "QUIRE_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and seed the default documents
    Init,
    /// Show or rotate the read API key
    ApiKey {
        #[command(subcommand)]
        action: ApiKeyAction,
    },
    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: CategoriesAction,
    },
    /// Inspect content
    Content {
        #[command(subcommand)]
        action: ContentAction,
    },
}

#[derive(Subcommand)]
enum ApiKeyAction {
    /// Print the current key
    Show,
    /// Generate, save and print a new key
    Rotate,
}

#[derive(Subcommand)]
enum CategoriesAction {
    /// List categories in stored order
    List,
    /// Add a category
    Add {
        /// Category name
        name: String,
    },
}

#[derive(Subcommand)]
enum ContentAction {
    /// List content, newest first
    List,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so command output can be piped
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quire_cli=info,quire_store=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(lines) => print_lines(&lines),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<Vec<String>, commands::CommandError> {
    let store = DataStore::open(cli.data_dir);

    match cli.command {
        Commands::Init => commands::init::run(&store).await,
        Commands::ApiKey { action } => match action {
            ApiKeyAction::Show => commands::api_key::show(&store).await.map(|key| vec![key]),
            ApiKeyAction::Rotate => commands::api_key::rotate(&store).await.map(|key| vec![key]),
        },
        Commands::Categories { action } => match action {
            CategoriesAction::List => commands::categories::list(&store).await,
            CategoriesAction::Add { name } => commands::categories::add(&store, &name).await,
        },
        Commands::Content { action } => match action {
            ContentAction::List => commands::content::list(&store).await,
        },
    }
}

#[allow(clippy::print_stdout)]
fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
