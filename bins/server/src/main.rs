//! Zeitsaldo API Server
//!
//! Main entry point for the Zeitsaldo backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zeitsaldo_api::{AppState, create_router, session::SessionService};
use zeitsaldo_core::auth::AppPassword;
use zeitsaldo_core::ledger::ReportTargets;
use zeitsaldo_shared::AppConfig;
use zeitsaldo_store::{CredentialStore, TransactionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zeitsaldo=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Open the document store
    let transactions =
        TransactionStore::open(config.store.data_dir.join("transactions.json")).await?;
    let credentials = CredentialStore::new(config.store.data_dir.join("credentials.json"));
    info!(data_dir = %config.store.data_dir.display(), "Document store opened");

    // Bootstrap the credential: an existing document wins; otherwise the
    // configured password is hashed and persisted on first run.
    let password_hash = match credentials.load().await? {
        Some(hash) => hash,
        None => {
            let password = config.auth.password.as_deref().context(
                "No credential stored yet; set ZEITSALDO__AUTH__PASSWORD for the first run",
            )?;
            let credential = AppPassword::create(password)?;
            credentials.save(credential.hash()).await?;
            info!("Initial application password stored");
            credential.hash().to_string()
        }
    };

    // Session service
    let ttl = chrono::Duration::seconds(i64::try_from(config.auth.session_ttl_secs)?);
    let sessions = SessionService::new(ttl);

    let targets = ReportTargets {
        weekly_hours: config.targets.weekly_hours,
        monthly_override_hours: config.targets.monthly_override_hours,
    };

    // Create application state
    let state = AppState {
        transactions: Arc::new(transactions),
        credentials: Arc::new(credentials),
        password_hash: Arc::new(tokio::sync::RwLock::new(password_hash)),
        sessions: Arc::new(sessions),
        targets,
    };

    // Create router
    let app = create_router(state, &config.server.frontend_origin)?;

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
