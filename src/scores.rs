//! Append-only score history backed by sqlite.

use crate::app::time::now_millis;
use serde::Serialize;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use std::path::PathBuf;

pub const MAX_SCORE: i64 = 1_000_000;

#[derive(Debug, Clone)]
pub struct ScoreStore {
  db: SqlitePool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreEntry {
  pub timestamp: i64,
  pub score: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreSummary {
  pub last: Option<i64>,
  pub best: Option<i64>,
}

impl ScoreStore {
  pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
    ensure_db_dir(database_url)?;
    let in_memory = database_url.contains(":memory:");
    let db = SqlitePoolOptions::new()
      .max_connections(if in_memory { 1 } else { 5 })
      .connect(database_url)
      .await?;
    sqlx::migrate!("./migrations").run(&db).await?;
    Ok(Self { db })
  }

  pub async fn append(&self, score: i64) -> anyhow::Result<()> {
    let id = uuid::Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO scores (id, score, created_at) VALUES (?, ?, ?)")
      .bind(id)
      .bind(score)
      .bind(now_millis())
      .execute(&self.db)
      .await?;
    tracing::debug!(score, "score recorded");
    Ok(())
  }

  /// Oldest first. Unreadable rows are skipped and a failed query reads as
  /// an empty history.
  pub async fn read_all(&self) -> Vec<ScoreEntry> {
    let rows = sqlx::query("SELECT score, created_at FROM scores ORDER BY created_at ASC, rowid ASC")
      .fetch_all(&self.db)
      .await;

    let rows = match rows {
      Ok(rows) => rows,
      Err(error) => {
        tracing::warn!(%error, "score history unreadable, treating as empty");
        return Vec::new();
      }
    };

    let total = rows.len();
    let entries = rows
      .into_iter()
      .filter_map(|row| {
        let score: i64 = row.try_get("score").ok()?;
        let timestamp: i64 = row.try_get("created_at").ok()?;
        Some(ScoreEntry { timestamp, score })
      })
      .collect::<Vec<_>>();
    if entries.len() < total {
      tracing::warn!(skipped = total - entries.len(), "skipped malformed score rows");
    }
    entries
  }

  pub async fn summary(&self) -> ScoreSummary {
    summarize(&self.read_all().await)
  }
}

pub fn summarize(entries: &[ScoreEntry]) -> ScoreSummary {
  ScoreSummary {
    last: entries.last().map(|entry| entry.score),
    best: entries.iter().map(|entry| entry.score).max(),
  }
}

/// Accepts a submitted score when it is a finite number within range.
pub fn validate_score(value: f64) -> Result<i64, &'static str> {
  if !value.is_finite() {
    return Err("Score must be a number");
  }
  let score = value.floor() as i64;
  if !(0..=MAX_SCORE).contains(&score) {
    return Err("Score out of range");
  }
  Ok(score)
}

fn ensure_db_dir(database_url: &str) -> anyhow::Result<()> {
  if database_url.starts_with("sqlite::memory:") {
    return Ok(());
  }
  let path = database_url
    .strip_prefix("sqlite://")
    .or_else(|| database_url.strip_prefix("sqlite:"));
  let Some(path) = path else { return Ok(()) };
  let path = path.split('?').next().unwrap_or_default();
  if path.is_empty() || path == ":memory:" {
    return Ok(());
  }
  let db_path = PathBuf::from(path);
  if let Some(parent) = db_path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  if !db_path.exists() {
    std::fs::File::create(&db_path)?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  async fn memory_store() -> ScoreStore {
    ScoreStore::connect("sqlite::memory:").await.expect("store")
  }

  #[tokio::test]
  async fn appended_scores_read_back_in_order() {
    let store = memory_store().await;
    for score in [3, 9, 4] {
      store.append(score).await.unwrap();
    }
    let scores: Vec<i64> = store.read_all().await.iter().map(|entry| entry.score).collect();
    assert_eq!(scores, vec![3, 9, 4]);
    assert_eq!(
      store.summary().await,
      ScoreSummary {
        last: Some(4),
        best: Some(9)
      }
    );
  }

  #[tokio::test]
  async fn empty_history_has_no_summary() {
    let store = memory_store().await;
    assert!(store.read_all().await.is_empty());
    assert_eq!(store.summary().await, ScoreSummary::default());
  }

  #[tokio::test]
  async fn malformed_rows_are_skipped() {
    let store = memory_store().await;
    store.append(5).await.unwrap();
    sqlx::query("INSERT INTO scores (id, score, created_at) VALUES ('bad', 'not a number', 1)")
      .execute(&store.db)
      .await
      .unwrap();
    let entries = store.read_all().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].score, 5);
  }

  #[tokio::test]
  async fn missing_table_reads_as_empty() {
    let db = SqlitePoolOptions::new()
      .max_connections(1)
      .connect("sqlite::memory:")
      .await
      .unwrap();
    let store = ScoreStore { db };
    assert!(store.read_all().await.is_empty());
    assert!(store.append(1).await.is_err());
  }

  #[test]
  fn submitted_scores_are_validated() {
    assert_eq!(validate_score(12.7), Ok(12));
    assert!(validate_score(f64::NAN).is_err());
    assert!(validate_score(-1.0).is_err());
    assert!(validate_score(MAX_SCORE as f64 + 1.0).is_err());
  }
}
