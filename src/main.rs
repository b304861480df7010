use cladmin::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    policy::PolicyStore,
    repository::{PostgresRepository, RepositoryState},
    sync::PolicySynchronizer,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Entry point: configuration, logging, database, policy store and its
/// startup bulk load, then the HTTP server.
#[tokio::main]
async fn main() {
    // 1. Configuration & environment loading (fail-fast).
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging filter setup. RUST_LOG wins; sensible defaults otherwise.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cladmin=debug,tower_http=info,axum=trace".into());

    // 3. Log format per environment: pretty locally, JSON in production for
    // log aggregators.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Database initialization (Postgres).
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db_url)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

    let repo = Arc::new(PostgresRepository::new(pool)) as RepositoryState;

    // 5. Policy store and synchronizer. The store starts empty and is
    // rebuilt wholesale from persisted truth before any request is served;
    // a partial load is a fatal startup condition.
    let policy = Arc::new(PolicyStore::new());
    let sync = Arc::new(PolicySynchronizer::new(repo.clone(), policy.clone()));

    sync.sync_all_roles()
        .await
        .expect("FATAL: failed to load role policies");
    sync.sync_all_users()
        .await
        .expect("FATAL: failed to load user policies");

    // 6. Unified state assembly.
    let app_state = AppState {
        repo,
        policy,
        sync,
        config: config.clone(),
    };

    // 7. Router and server startup.
    let app = create_router(app_state);

    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .expect("FATAL: failed to bind listen address");

    tracing::info!("Listening on {}", config.listen_addr);
    tracing::info!("API documentation (Swagger UI) available at /swagger-ui");

    axum::serve(listener, app).await.unwrap();
}
