use super::relay_link::RelayLink;
use crate::config::{ConfigError, GameConfig};
use crate::game::engine::{step, DeathCause, GameState, StepEvent};
use crate::game::geometry::vector_of;
use crate::game::input::direction_from_key;
use crate::game::types::{Cell, Direction, Segment};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// What a single frame did to the round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
  Idle,
  Ticked,
  Ate { length: usize },
  RoundOver { score: usize, cause: DeathCause },
}

/// Read-only view handed to renderers each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
  pub segments: Vec<Segment>,
  pub apple: Option<Cell>,
  pub progress: f64,
  pub alive: bool,
  pub score: usize,
}

impl FrameView {
  /// Pixel position of each segment, slid `progress` of a cell along its heading.
  pub fn positions(&self, pixel_size: u32) -> Vec<(f64, f64)> {
    let size = f64::from(pixel_size);
    self
      .segments
      .iter()
      .map(|segment| {
        let (dx, dy) = vector_of(segment.heading);
        (
          (f64::from(segment.cell.x) + f64::from(dx) * self.progress) * size,
          (f64::from(segment.cell.y) + f64::from(dy) * self.progress) * size,
        )
      })
      .collect()
  }
}

/// One player's round plus, optionally, the relay that steers it.
///
/// Without a relay, presses go straight into the input queue. With one,
/// presses are sent out and the queue is fed from what the relay sends
/// back, so both players' intents pass through a single queue. Losing the
/// relay drops back to local control.
#[derive(Debug)]
pub struct Session {
  config: GameConfig,
  state: GameState,
  rng: StdRng,
  relay: Option<RelayLink>,
}

impl Session {
  pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
    Self::with_rng(config, StdRng::from_entropy())
  }

  pub fn seeded(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
    Self::with_rng(config, StdRng::seed_from_u64(seed))
  }

  fn with_rng(config: GameConfig, mut rng: StdRng) -> Result<Self, ConfigError> {
    config.validate()?;
    let state = GameState::new(&config, &mut rng);
    Ok(Self {
      config,
      state,
      rng,
      relay: None,
    })
  }

  pub fn config(&self) -> &GameConfig {
    &self.config
  }

  pub fn state(&self) -> &GameState {
    &self.state
  }

  pub fn attach_relay(&mut self, link: RelayLink) {
    tracing::info!(ts = link.room().ts, "steering through relay");
    self.relay = Some(link);
  }

  pub fn detach_relay(&mut self) -> Option<RelayLink> {
    self.relay.take()
  }

  pub fn relay(&self) -> Option<&RelayLink> {
    self.relay.as_ref()
  }

  pub fn press(&mut self, direction: Direction, now_ms: u64) {
    if let Some(link) = &self.relay {
      match link.send_move(direction) {
        Ok(()) => return,
        Err(error) => {
          tracing::warn!(%error, "relay send failed, continuing locally");
          self.relay = None;
        }
      }
    }
    self
      .state
      .pending
      .press(direction, now_ms, self.config.input_window_ms);
  }

  /// Returns `false` for keys that are not game keys.
  pub fn press_key(&mut self, key: &str, now_ms: u64) -> bool {
    let Some(direction) = direction_from_key(key) else { return false };
    self.press(direction, now_ms);
    true
  }

  pub fn frame(&mut self, delta_ms: f64) -> FrameOutcome {
    self.sync_relay();
    if !self.state.clock.advance(delta_ms, self.state.speed) {
      return FrameOutcome::Idle;
    }

    let result = step(&self.state, &self.config, &mut self.rng);
    self.state = result.state;
    match result.event {
      None => FrameOutcome::Ticked,
      Some(StepEvent::Ate { length, .. }) => FrameOutcome::Ate { length },
      Some(StepEvent::Died { score, cause }) => {
        tracing::info!(score, ?cause, "round over");
        FrameOutcome::RoundOver { score, cause }
      }
    }
  }

  pub fn frame_view(&self) -> FrameView {
    FrameView {
      segments: self.state.snake.clone(),
      apple: self.state.apple,
      progress: self.state.progress(),
      alive: self.state.alive,
      score: self.state.score(),
    }
  }

  /// Throws the current round away. The relay, if any, stays attached.
  pub fn restart(&mut self) {
    self.state = GameState::new(&self.config, &mut self.rng);
  }

  fn sync_relay(&mut self) {
    let Some(link) = self.relay.as_mut() else { return };
    match link.poll_moves() {
      Ok(moves) => {
        for direction in moves {
          self.state.pending.enqueue(direction);
        }
      }
      Err(error) => {
        tracing::warn!(%error, "relay lost, continuing locally");
        self.relay = None;
      }
    }
  }
}
