//! Restaurant review CLI - collection setup and user management.
//!
//! # Usage
//!
//! ```bash
//! # Create the schema, collections, username index, and session table
//! reviews-cli collections init
//!
//! # Register a user without the web form
//! reviews-cli user create -u alice -p 'correct horse battery staple'
//! ```
//!
//! # Commands
//!
//! - `collections init` - Prepare the database
//! - `user create` - Create users

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "reviews-cli")]
#[command(author, version, about = "Restaurant review CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage document collections
    Collections {
        #[command(subcommand)]
        action: CollectionsAction,
    },
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum CollectionsAction {
    /// Create collections, indexes, and the session table if missing
    Init,
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Username (unique, at most 64 characters)
        #[arg(short, long)]
        username: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Collections { action } => match action {
            CollectionsAction::Init => commands::collections::init().await?,
        },
        Commands::User { action } => match action {
            UserAction::Create { username, password } => {
                commands::user::create_user(&username, &password).await?;
            }
        },
    }
    Ok(())
}
