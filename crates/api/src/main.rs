use anyhow::{Context, Result};
use domain::services::Planner;
use tracing::info;
use trip_planner_api::{app, config, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    middleware::logging::init_logging(&config.logging)?;
    middleware::init_metrics()?;

    info!("Starting Trip Planner API v{}", env!("CARGO_PKG_VERSION"));

    let pool = persistence::db::create_pool(&config.database)
        .await
        .context("failed to connect to the database")?;

    info!("Running database migrations...");
    persistence::db::run_migrations(&pool).await?;
    info!("Migrations completed");

    let planner = Planner::new(persistence::pg_stores(pool.clone()), config.invite_settings());
    let addr = config.socket_addr()?;
    let app = app::create_app(config, planner, Some(pool));

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
