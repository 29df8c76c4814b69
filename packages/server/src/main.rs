use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::clock::{Clock, SystemClock};
use server::config::AppConfig;
use server::repository::Repositories;
use server::seed;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let repos = Repositories::in_memory();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let summary = seed::seed_demo(&repos, &config.demo, &config.auth, clock.now())
        .await
        .context("Failed to seed demo data")?;
    info!(
        season = %summary.season_id,
        teams = summary.teams,
        fixtures = summary.fixtures,
        users = summary.users,
        "Demo data seeded"
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        config,
        repos,
        clock,
    };
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
