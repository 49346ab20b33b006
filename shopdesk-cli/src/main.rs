//! ShopDesk CLI - browse and manage a DummyJSON shop from the terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{auth, cart, carts, categories, demo, logs, product, products, search};

/// ShopDesk - products, carts and accounts from the terminal
#[derive(Parser)]
#[command(name = "shop", version, about, long_about = None)]
struct Cli {
    /// Answer yes to confirmation prompts
    #[arg(long, short, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products, optionally filtered
    Products {
        /// Search query (ignored when a category is given)
        #[arg(long, short)]
        search: Option<String>,
        /// Category slug
        #[arg(long, short)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show, create, update or delete a product
    Product {
        #[command(subcommand)]
        command: product::ProductCommands,
    },

    /// List categories, or the products in one
    Categories {
        /// Category slug
        name: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List carts or add one
    Carts {
        #[command(subcommand)]
        command: Option<carts::CartsCommands>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Work with a single cart
    Cart {
        #[command(subcommand)]
        command: cart::CartCommands,
    },

    /// Search products interactively
    Search {
        /// Restrict to one category
        #[arg(long, short)]
        category: Option<String>,
    },

    /// Log in and remember the session
    Login {
        #[arg(long, short)]
        username: Option<String>,
        #[arg(long, short, env = "SHOPDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Exchange the stored token for a fresh one
    Refresh,

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },

    /// Manage demo mode
    Demo {
        #[command(subcommand)]
        command: Option<demo::DemoCommands>,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Products { .. } => "products",
            Commands::Product { .. } => "product",
            Commands::Categories { .. } => "categories",
            Commands::Carts { .. } => "carts",
            Commands::Cart { .. } => "cart",
            Commands::Search { .. } => "search",
            Commands::Login { .. } => "login",
            Commands::Logout => "logout",
            Commands::Whoami { .. } => "whoami",
            Commands::Refresh => "refresh",
            Commands::Logs { .. } => "logs",
            Commands::Demo { .. } => "demo",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let name = cli.command.name();

    let result = run(cli).await;

    // Opened after the command so its own connection to logs.duckdb is closed
    let logger = commands::get_logger();

    let error = result.as_ref().err().map(|e| e.to_string());
    if let Some(l) = &logger {
        // Logging should never break the app
        let _ = l.log_command(name, error.as_deref());
    }

    match error {
        None => ExitCode::SUCCESS,
        Some(message) => {
            output::error(&message);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let yes = cli.yes;
    match cli.command {
        Commands::Products {
            search,
            category,
            json,
        } => products::run(category, search, json).await,
        Commands::Product { command } => product::run(command, yes).await,
        Commands::Categories { name, json } => categories::run(name, json).await,
        Commands::Carts { command, json } => carts::run(command, json).await,
        Commands::Cart { command } => cart::run(command, yes).await,
        Commands::Search { category } => search::run(category).await,
        Commands::Login { username, password } => auth::login(username, password).await,
        Commands::Logout => auth::logout(),
        Commands::Whoami { json } => auth::whoami(json).await,
        Commands::Refresh => auth::refresh().await,
        Commands::Logs { command } => logs::run(command),
        Commands::Demo { command } => demo::run(command),
    }
}
