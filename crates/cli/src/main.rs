//! Support Desk CLI - database migrations and admin account management.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending migrations
//! desk-cli migrate
//!
//! # Create an admin (password from --password or DESK_ADMIN_PASSWORD)
//! DESK_ADMIN_PASSWORD=... desk-cli admin create -u admin
//!
//! # Change a password, list and remove admins
//! desk-cli admin set-password -u admin --password ...
//! desk-cli admin list
//! desk-cli admin delete -u admin
//! ```
//!
//! The database is taken from `DESK_DATABASE_URL` (or `DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use secrecy::SecretString;

mod commands;

#[derive(Parser)]
#[command(name = "desk-cli")]
#[command(author, version, about = "Support Desk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Password (at least 8 characters)
        #[arg(long, env = "DESK_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Replace an admin's password
    SetPassword {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// New password (at least 8 characters)
        #[arg(long, env = "DESK_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// List admin accounts
    List,
    /// Delete an admin account
    Delete {
        /// Login name
        #[arg(short, long)]
        username: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let pool = commands::connect().await?;

    match cli.command {
        Commands::Migrate => commands::migrate::run(&pool).await?,
        Commands::Admin { action } => match action {
            AdminAction::Create { username, password } => {
                let password = SecretString::from(password);
                commands::admin::create(&pool, &username, &password).await?;
            }
            AdminAction::SetPassword { username, password } => {
                let password = SecretString::from(password);
                commands::admin::set_password(&pool, &username, &password).await?;
            }
            AdminAction::List => commands::admin::list(&pool).await?,
            AdminAction::Delete { username } => {
                commands::admin::delete(&pool, &username).await?;
            }
        },
    }
    Ok(())
}
