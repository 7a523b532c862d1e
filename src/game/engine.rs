use super::clock::TickClock;
use super::constants::{RANDOM_APPLE_ATTEMPTS, STARTING_LENGTH};
use super::geometry::{in_bounds, offset, same_cell, self_collision};
use super::input::InputQueue;
use super::types::{Cell, Direction, Segment, Snake};
use crate::config::GameConfig;
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
  pub snake: Snake,
  pub apple: Option<Cell>,
  /// Current tick duration in milliseconds. Infinite once the round is over.
  pub speed: f64,
  pub pending: InputQueue,
  pub alive: bool,
  pub clock: TickClock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
  Wall,
  SelfCollision,
  BoardFull,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepEvent {
  Ate { length: usize, speed: f64 },
  Died { score: usize, cause: DeathCause },
}

#[derive(Debug, Clone)]
pub struct StepResult {
  pub state: GameState,
  pub event: Option<StepEvent>,
}

impl GameState {
  /// Fresh round: three segments heading right along the middle row.
  pub fn new<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Self {
    let row = config.grid_size / 2;
    let snake: Snake = (0..STARTING_LENGTH as i32)
      .rev()
      .map(|x| Segment::new(x, row, Direction::Right))
      .collect();
    let apple = place_apple(&snake, config.grid_size, rng);
    Self::with_snake(snake, apple, config.base_tick_ms)
  }

  pub fn with_snake(snake: Snake, apple: Option<Cell>, speed: f64) -> Self {
    Self {
      snake,
      apple,
      speed,
      pending: InputQueue::new(),
      alive: true,
      clock: TickClock::new(),
    }
  }

  pub fn head(&self) -> Option<&Segment> {
    self.snake.first()
  }

  pub fn heading(&self) -> Option<Direction> {
    self.head().map(|segment| segment.heading)
  }

  pub fn score(&self) -> usize {
    self.snake.len()
  }

  pub fn progress(&self) -> f64 {
    self.clock.progress(self.speed)
  }

  fn terminate(&mut self, cause: DeathCause) -> StepEvent {
    self.alive = false;
    self.speed = f64::INFINITY;
    StepEvent::Died {
      score: self.score(),
      cause,
    }
  }
}

/// Advances one tick. A terminated state comes back unchanged.
pub fn step<R: Rng + ?Sized>(state: &GameState, config: &GameConfig, rng: &mut R) -> StepResult {
  if !state.alive {
    return StepResult {
      state: state.clone(),
      event: None,
    };
  }

  let mut next = state.clone();
  let (Some(head), Some(old_tail)) = (next.snake.first().copied(), next.snake.last().copied()) else {
    let event = next.terminate(DeathCause::SelfCollision);
    return StepResult {
      state: next,
      event: Some(event),
    };
  };

  let direction = next.pending.resolve_next(head.heading);
  let new_head = Segment {
    cell: offset(head.cell, direction),
    heading: direction,
  };
  next.snake.rotate_right(1);
  next.snake[0] = new_head;

  if !in_bounds(new_head.cell, config.grid_size) {
    return freeze(state, next, DeathCause::Wall);
  }
  if self_collision(&next.snake) {
    return freeze(state, next, DeathCause::SelfCollision);
  }

  let mut event = None;
  if next.apple.is_some_and(|apple| same_cell(apple, new_head.cell)) {
    // The vacated tail cell becomes the new tail.
    next.snake.push(old_tail);
    next.speed *= config.growth_factor;
    next.apple = place_apple(&next.snake, config.grid_size, rng);
    if next.apple.is_none() {
      let event = next.terminate(DeathCause::BoardFull);
      return StepResult {
        state: next,
        event: Some(event),
      };
    }
    event = Some(StepEvent::Ate {
      length: next.snake.len(),
      speed: next.speed,
    });
  }

  StepResult { state: next, event }
}

/// Keeps the last legal body on screen; only the queue and flags move on.
fn freeze(previous: &GameState, mut next: GameState, cause: DeathCause) -> StepResult {
  next.snake = previous.snake.clone();
  let event = next.terminate(cause);
  tracing::debug!(?cause, score = next.score(), "snake died");
  StepResult {
    state: next,
    event: Some(event),
  }
}

/// Picks a free cell: random draws first, then a uniform pick among the
/// remaining free cells. `None` when the board is full.
pub fn place_apple<R: Rng + ?Sized>(snake: &[Segment], grid_size: i32, rng: &mut R) -> Option<Cell> {
  if grid_size <= 0 {
    return None;
  }
  let occupied = |cell: Cell| snake.iter().any(|segment| same_cell(segment.cell, cell));

  for _ in 0..RANDOM_APPLE_ATTEMPTS {
    let candidate = Cell::new(rng.gen_range(0..grid_size), rng.gen_range(0..grid_size));
    if !occupied(candidate) {
      return Some(candidate);
    }
  }

  let free: Vec<Cell> = (0..grid_size)
    .flat_map(|y| (0..grid_size).map(move |x| Cell::new(x, y)))
    .filter(|cell| !occupied(*cell))
    .collect();
  free.choose(rng).copied()
}
