pub mod time;

use crate::config::GameConfig;
use crate::relay::Relay;
use crate::scores::{self, ScoreEntry, ScoreStore};
use crate::transport::ws_session::handle_socket;
use axum::{
  extract::{State, WebSocketUpgrade},
  http::{Method, StatusCode},
  response::IntoResponse,
  routing::get,
  Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Debug)]
pub struct AppState {
  pub relay: Arc<Relay>,
  pub scores: ScoreStore,
  pub game: GameConfig,
}

impl AppState {
  pub fn new(scores: ScoreStore, game: GameConfig) -> Self {
    Self {
      relay: Arc::new(Relay::new()),
      scores,
      game,
    }
  }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
  ok: bool,
  rooms: usize,
  sessions: usize,
}

#[derive(Debug, Serialize)]
struct ScoresResponse {
  scores: Vec<ScoreEntry>,
  last: Option<i64>,
  best: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ScoreSubmission {
  score: Option<f64>,
}

#[derive(Debug, Serialize)]
struct OkResponse {
  ok: bool,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
  ok: bool,
  error: String,
}

pub fn router(state: Arc<AppState>) -> Router {
  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([Method::GET, Method::POST])
    .allow_headers(Any);

  Router::new()
    .route("/api/health", get(health))
    .route("/api/config", get(game_config))
    .route("/api/scores", get(scores_get).post(scores_post))
    .route("/api/relay", get(relay_handler))
    .layer(cors)
    .with_state(state)
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let stats = state.relay.stats();
  Json(HealthResponse {
    ok: true,
    rooms: stats.rooms,
    sessions: stats.sessions,
  })
}

async fn game_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(state.game.clone())
}

async fn scores_get(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let scores = state.scores.read_all().await;
  let summary = scores::summarize(&scores);
  Json(ScoresResponse {
    scores,
    last: summary.last,
    best: summary.best,
  })
}

async fn scores_post(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<ScoreSubmission>, axum::extract::rejection::JsonRejection>,
) -> impl IntoResponse {
  let Json(payload) = match payload {
    Ok(payload) => payload,
    Err(_) => return error_response(StatusCode::BAD_REQUEST, "Invalid JSON"),
  };

  let score = match scores::validate_score(payload.score.unwrap_or(f64::NAN)) {
    Ok(score) => score,
    Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
  };

  if let Err(error) = state.scores.append(score).await {
    tracing::warn!(%error, "score submission failed");
    return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Submission failed");
  }

  (StatusCode::OK, Json(OkResponse { ok: true })).into_response()
}

async fn relay_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let relay = Arc::clone(&state.relay);
  ws.on_upgrade(move |socket| handle_socket(socket, relay))
}

fn error_response(status: StatusCode, error: &str) -> axum::response::Response {
  (
    status,
    Json(ErrorResponse {
      ok: false,
      error: error.to_string(),
    }),
  )
    .into_response()
}
