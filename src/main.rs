use grid_snake::app::{self, AppState};
use grid_snake::config::ServerConfig;
use grid_snake::scores::ScoreStore;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let config = ServerConfig::from_env()?;
  let scores = ScoreStore::connect(&config.database_url).await?;
  let state = Arc::new(AppState::new(scores, config.game.clone()));
  let app = app::router(state);

  let address = format!("0.0.0.0:{}", config.port);
  tracing::info!(
    grid_size = config.game.grid_size,
    base_tick_ms = config.game.base_tick_ms,
    "listening on {address}"
  );

  let listener = tokio::net::TcpListener::bind(&address).await?;
  axum::serve(listener, app).await?;

  Ok(())
}
