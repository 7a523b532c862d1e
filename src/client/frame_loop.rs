use super::session::{FrameOutcome, FrameView, Session};
use crate::game::constants::FRAME_INTERVAL_MS;
use crate::scores::{ScoreStore, ScoreSummary};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Roughly one display refresh.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(FRAME_INTERVAL_MS);

pub trait Renderer: Send + 'static {
  fn render(&mut self, view: &FrameView);

  fn round_over(&mut self, _score: usize, _summary: Option<ScoreSummary>) {}
}

/// Drives a shared session from a fixed-rate timer standing in for the
/// display's frame callback. Dropping the loop cancels it between frames.
#[derive(Debug)]
pub struct FrameLoop {
  task: JoinHandle<()>,
}

impl FrameLoop {
  pub fn spawn<R: Renderer>(
    session: Arc<StdMutex<Session>>,
    mut renderer: R,
    scores: Option<ScoreStore>,
    interval: Duration,
  ) -> Self {
    let task = tokio::spawn(async move {
      let mut ticker = tokio::time::interval(interval);
      ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
      let mut previous = Instant::now();
      loop {
        ticker.tick().await;
        let now = Instant::now();
        let delta_ms = now.duration_since(previous).as_secs_f64() * 1_000.0;
        previous = now;

        let (outcome, view) = {
          let mut session = session.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
          let outcome = session.frame(delta_ms);
          (outcome, session.frame_view())
        };
        renderer.render(&view);

        if let FrameOutcome::RoundOver { score, .. } = outcome {
          let summary = match &scores {
            Some(store) => record_score(store, score).await,
            None => None,
          };
          renderer.round_over(score, summary);
        }
      }
    });
    Self { task }
  }

  pub fn stop(self) {
    self.task.abort();
  }
}

impl Drop for FrameLoop {
  fn drop(&mut self) {
    self.task.abort();
  }
}

async fn record_score(store: &ScoreStore, score: usize) -> Option<ScoreSummary> {
  let score = i64::try_from(score).unwrap_or(i64::MAX);
  if let Err(error) = store.append(score).await {
    tracing::warn!(%error, score, "could not record score");
    return None;
  }
  Some(store.summary().await)
}
