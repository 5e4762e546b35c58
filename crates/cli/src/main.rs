//! Tilbud CLI - Browse discounted products across store locations.
//!
//! # Usage
//!
//! ```bash
//! # Sign in / out
//! tilbud auth login -e user@example.com -p hunter2
//! tilbud auth logout
//! tilbud auth whoami
//!
//! # Browse stores
//! tilbud stores list
//! tilbud stores list --postal-code 2100 --query netto
//!
//! # Browse a store's discounted products
//! tilbud stores show <store-id> --in-stock --sort price-asc
//!
//! # Favorites (requires sign-in)
//! tilbud favorites list
//! tilbud favorites toggle <store-id>
//! ```
//!
//! # Environment Variables
//!
//! - `TILBUD_API_URL` - Base URL of the Tilbud backend (required)
//! - `TILBUD_TOKEN_FILE` - Bearer token location (optional)
//! - `RUST_LOG` - Tracing filter, e.g. `tilbud_client=debug`

#![cfg_attr(not(test), forbid(unsafe_code))]
// A terminal tool's output goes to stdout/stderr.
#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::{Parser, Subcommand};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "tilbud")]
#[command(author, version, about = "Find discounted products near you")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, sign out, or inspect the current session
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Browse stores and their discounted products
    Stores {
        #[command(subcommand)]
        action: StoresAction,
    },
    /// Manage favorite stores
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Sign in with email and password
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Sign out and discard the stored token
    Logout,
    /// Show the signed-in identity
    Whoami,
}

#[derive(Subcommand)]
enum StoresAction {
    /// List stores, optionally narrowed by postal code and free text
    List {
        /// Server-side postal code filter
        #[arg(long)]
        postal_code: Option<String>,

        /// Free-text search over name, brand, city, and postal code
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Show one store's discounted products
    Show {
        /// Store id
        id: String,

        /// Free-text search over product names
        #[arg(short, long)]
        query: Option<String>,

        /// Keep only these categories (repeatable)
        #[arg(short, long)]
        category: Vec<String>,

        /// Minimum discounted price
        #[arg(long)]
        min_price: Option<String>,

        /// Maximum discounted price
        #[arg(long)]
        max_price: Option<String>,

        /// Minimum percent discount
        #[arg(long)]
        min_discount: Option<String>,

        /// Maximum percent discount
        #[arg(long)]
        max_discount: Option<String>,

        /// Keep only products with stock remaining
        #[arg(long)]
        in_stock: bool,

        /// Sort order: price-asc, price-desc, discount-desc, expiry-asc, stock-desc
        #[arg(short, long)]
        sort: Option<String>,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorite stores
    List,
    /// Flip a store's favorite status
    Toggle {
        /// Store id
        id: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        if e.is_fatal() {
            tracing::error!("Command failed: {e}");
        }
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Auth { action } => match action {
            AuthAction::Login { email, password } => commands::auth::login(&email, &password).await,
            AuthAction::Register {
                name,
                email,
                password,
            } => commands::auth::register(&name, &email, &password).await,
            AuthAction::Logout => commands::auth::logout(),
            AuthAction::Whoami => commands::auth::whoami(),
        },
        Commands::Stores { action } => match action {
            StoresAction::List { postal_code, query } => {
                commands::stores::list(postal_code.as_deref(), query.as_deref()).await
            }
            StoresAction::Show {
                id,
                query,
                category,
                min_price,
                max_price,
                min_discount,
                max_discount,
                in_stock,
                sort,
            } => {
                let criteria = commands::stores::ShowCriteria {
                    query,
                    categories: category,
                    min_price,
                    max_price,
                    min_discount,
                    max_discount,
                    in_stock,
                    sort,
                };
                commands::stores::show(&id, &criteria).await
            }
        },
        Commands::Favorites { action } => match action {
            FavoritesAction::List => commands::favorites::list().await,
            FavoritesAction::Toggle { id } => commands::favorites::toggle(&id).await,
        },
    }
}
