use shareit::{
    adapters::{memory, postgres},
    api::{handlers::AppState, router::create_router},
    config::{Config, StorageKind},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shareit=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Initialize adapters
    let service_deps = match config.storage {
        StorageKind::Postgres => {
            tracing::info!("Connecting to PostgreSQL");

            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
                .await?;

            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Migrations applied");

            postgres::service_dependencies(pool)
        }
        StorageKind::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            memory::service_dependencies()
        }
    };

    let app_state = Arc::new(AppState { service_deps });
    let app = create_router(app_state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
