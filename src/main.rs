//! bankd - account management and funds transfer service.
//!
//! A REST API for creating accounts, authenticating users, and transferring
//! funds between accounts, backed by PostgreSQL.
//!
//! # Architecture
//!
//! - **Web framework**: axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries, embedded migrations)
//! - **Authentication**: HMAC-SHA256 signed bearer tokens, argon2 passwords
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool and run migrations
//! 3. Handle `--seed` / `--create-admin` bootstrap flags
//! 4. Build the router and start serving

mod app;
mod auth;
mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;
mod retry;
mod services;
mod state;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::{
    auth::token::TokenSigner,
    models::account::CreateAccountRequest,
    retry::RetryPolicy,
    services::account_service,
    state::AppState,
};

#[derive(Debug, Parser)]
#[command(name = "bankd", about = "account management and funds transfer service")]
struct Cli {
    /// Seed the database with a demo user account
    #[arg(long)]
    seed: bool,

    /// Create an admin account and exit
    #[arg(long, num_args = 3, value_names = ["FIRST", "LAST", "PASSWORD"])]
    create_admin: Option<Vec<String>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controls verbosity, defaulting to "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    if let Some(args) = cli.create_admin {
        let account = account_service::create_account(
            &pool,
            CreateAccountRequest {
                first_name: args[0].clone(),
                last_name: args[1].clone(),
                password: args[2].clone(),
                role: "admin".to_string(),
                balance: 0,
            },
        )
        .await?;
        tracing::info!(number = account.number, "admin account created");
        return Ok(());
    }

    if cli.seed {
        seed_accounts(&pool).await?;
    }

    let state = AppState {
        pool,
        tokens: TokenSigner::new(&config.jwt_secret)?,
        retry: RetryPolicy::default(),
    };

    let app = app::build_router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Seed a demo user account for local development.
async fn seed_accounts(pool: &db::DbPool) -> Result<(), error::AppError> {
    let account = account_service::create_account(
        pool,
        CreateAccountRequest {
            first_name: "luis".to_string(),
            last_name: "cast".to_string(),
            password: "password".to_string(),
            role: "user".to_string(),
            balance: 100,
        },
    )
    .await?;

    tracing::info!(number = account.number, "seeded demo account");

    Ok(())
}
