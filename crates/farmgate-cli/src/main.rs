//! Farmgate CLI
//!
//! Storefront client for the farm-to-consumer marketplace. All business
//! logic lives in the remote API; this binary renders listings, drives
//! the cart, and enforces role-gated navigation on the way.

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use farmgate_cli::config::CliConfig;
use farmgate_cli::{admin_cmd, auth_cmd, cart_cmd, nav, order_cmd, product_cmd};
use farmgate_client::{ApiClient, ApiError};
use farmgate_core::session::SessionStore;
use farmgate_core::tracing_init::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "farmgate")]
#[command(version, about = "Farm-to-consumer marketplace CLI", long_about = None)]
struct Cli {
    /// Marketplace API base URL.
    #[arg(long, env = "FARMGATE_API_URL", global = true)]
    api_url: Option<String>,

    /// Emit structured JSON log lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Login, logout, registration, session status.
    Auth {
        #[command(subcommand)]
        action: auth_cmd::AuthAction,
    },
    /// Browse and manage products.
    Products {
        #[command(subcommand)]
        action: product_cmd::ProductAction,
    },
    /// Shopping cart and checkout.
    Cart {
        #[command(subcommand)]
        action: cart_cmd::CartAction,
    },
    /// Order views and status transitions.
    Orders {
        #[command(subcommand)]
        action: order_cmd::OrderAction,
    },
    /// Admin dashboard and product validation.
    Admin {
        #[command(subcommand)]
        action: admin_cmd::AdminAction,
    },
    /// Resolve a path through the route table and report the outcome.
    Open { path: String },
    /// Persist the API base URL.
    SetUrl { url: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing("farmgate=info", cli.log_json);

    let config = CliConfig::load();
    let api_url = config.resolve_api_url(cli.api_url.as_deref());

    let session_path = SessionStore::default_path()
        .ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    let session = Arc::new(SessionStore::open(session_path));
    let client = Arc::new(ApiClient::new(&api_url, Arc::clone(&session))?);

    info!(%api_url, "farmgate CLI starting");

    let result = match cli.command {
        Command::Auth { action } => auth_cmd::run(action, &client, &session).await,
        Command::Products { action } => product_cmd::run(action, &client, &session).await,
        Command::Cart { action } => cart_cmd::run(action, &client, &session).await,
        Command::Orders { action } => order_cmd::run(action, &client, &session).await,
        Command::Admin { action } => admin_cmd::run(action, &client, &session).await,
        Command::Open { path } => nav::open(&session, &path),
        Command::SetUrl { url } => {
            let mut config = config;
            config.api_url = Some(url);
            config.save()
        }
    };

    // Shape API failures per the error taxonomy: a mid-session 401 has
    // already cleared the session by the time it reaches here.
    result.map_err(|err| match err.downcast_ref::<ApiError>() {
        Some(ApiError::Unauthorized) => anyhow::anyhow!("Session expired. Please log in again."),
        Some(ApiError::Http(_)) => err.context("network failure; check the server and retry"),
        _ => err,
    })
}
