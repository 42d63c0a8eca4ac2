//! Standalone seeding binary: connects, migrates and seeds, then exits.

use std::sync::Arc;

use anyhow::Context;

use kangmas_shop as app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = app::config::load_config()?;
    app::config::init_tracing(cfg.log_level(), cfg.log_json);

    let pool = app::db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to the database")?;
    app::db::run_migrations(&pool)
        .await
        .context("failed to run migrations")?;
    app::seed::run(Arc::new(pool))
        .await
        .context("failed to seed initial data")?;

    println!("seed complete");
    Ok(())
}
