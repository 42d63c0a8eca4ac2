use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;

use kangmas_shop as app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = app::config::load_config()?;
    app::config::init_tracing(cfg.log_level(), cfg.log_json);

    let pool = app::db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to the database")?;
    if cfg.auto_migrate {
        app::db::run_migrations(&pool)
            .await
            .context("failed to run migrations")?;
    }

    let db = Arc::new(pool);
    if cfg.seed_on_startup {
        app::seed::run(db.clone())
            .await
            .context("failed to seed initial data")?;
    }

    let services = app::services::AppServices::new(db.clone(), &cfg);
    let state = Arc::new(app::AppState {
        db,
        config: cfg.clone(),
        services,
    });

    let router = app::app_router(state);
    let listener = tokio::net::TcpListener::bind(cfg.server_addr())
        .await
        .with_context(|| format!("failed to bind {}", cfg.server_addr()))?;
    info!(addr = %cfg.server_addr(), environment = %cfg.environment, "server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
