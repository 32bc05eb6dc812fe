use std::sync::{Arc, Mutex};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use bookdesk::config::{AppConfig, StoreBackend};
use bookdesk::db;
use bookdesk::errors::AppError;
use bookdesk::handlers;
use bookdesk::services::identity::{FirebaseIdentity, IdentityService, LocalIdentity};
use bookdesk::services::repository::BookingRepository;
use bookdesk::services::sessions::SessionRegistry;
use bookdesk::state::AppState;
use bookdesk::store::{DocumentStore, FirestoreStore, MemoryStore, SqliteStore};

fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = match config.store_backend {
        StoreBackend::Sqlite => {
            let conn = db::init_db(&config.database_url)
                .with_context(|| format!("failed to open database {}", config.database_url))?;
            tracing::info!("using sqlite document store ({})", config.database_url);
            Arc::new(SqliteStore::new(
                Arc::new(Mutex::new(conn)),
                config.bookings_collection.clone(),
            ))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory document store; bookings are lost on exit");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Firestore => {
            if config.firebase_project_id.is_empty() {
                return Err(AppError::Config(
                    "FIREBASE_PROJECT_ID must be set when STORE_BACKEND=firestore".to_string(),
                )
                .into());
            }
            tracing::info!("using firestore document store (project: {})", config.firebase_project_id);
            let id_token = Some(config.firestore_id_token.clone()).filter(|t| !t.is_empty());
            Arc::new(FirestoreStore::new(
                &config.firebase_project_id,
                &config.bookings_collection,
                config.firebase_api_key.clone(),
                id_token,
            ))
        }
    };
    Ok(store)
}

fn build_identity(config: &AppConfig) -> Arc<dyn IdentityService> {
    if config.uses_firebase_identity() {
        tracing::info!("using Firebase Auth sign-in");
        Arc::new(FirebaseIdentity::new(config.firebase_api_key.clone()))
    } else {
        tracing::info!("using local sign-in for {}", config.login_email);
        Arc::new(LocalIdentity::new(
            config.login_email.clone(),
            config.login_password.clone(),
        ))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let store = build_store(&config).context("failed to set up the booking store")?;
    let identity = build_identity(&config);
    identity.restore().await;

    let state = Arc::new(AppState {
        config: config.clone(),
        repository: BookingRepository::new(store),
        identity,
        sessions: SessionRegistry::new(),
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
