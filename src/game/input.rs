use super::types::Direction;
use std::collections::VecDeque;

/// Maps keyboard key names (DOM `KeyboardEvent.key` style) to directions.
/// Anything else is not a game key.
pub fn direction_from_key(key: &str) -> Option<Direction> {
  match key {
    "ArrowUp" | "w" | "W" | "k" => Some(Direction::Up),
    "ArrowDown" | "s" | "S" | "j" => Some(Direction::Down),
    "ArrowLeft" | "a" | "A" | "h" => Some(Direction::Left),
    "ArrowRight" | "d" | "D" | "l" => Some(Direction::Right),
    _ => None,
  }
}

/// Pending directional intents, most recent last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputQueue {
  pending: VecDeque<Direction>,
  last_press_at: Option<u64>,
}

impl InputQueue {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.pending.len()
  }

  pub fn is_empty(&self) -> bool {
    self.pending.is_empty()
  }

  pub fn tail(&self) -> Option<Direction> {
    self.pending.back().copied()
  }

  pub fn iter(&self) -> impl Iterator<Item = &Direction> {
    self.pending.iter()
  }

  /// Appends unless the tail already holds the same direction.
  /// Returns whether the queue changed.
  pub fn enqueue(&mut self, direction: Direction) -> bool {
    if self.tail() == Some(direction) {
      return false;
    }
    self.pending.push_back(direction);
    true
  }

  /// Keyboard entry point. Presses within `window_ms` of the previous press
  /// extend the queue; a later press replaces it with a single entry.
  pub fn press(&mut self, direction: Direction, now_ms: u64, window_ms: u64) -> bool {
    let within_window = self
      .last_press_at
      .map(|last| now_ms.saturating_sub(last) <= window_ms)
      .unwrap_or(false);
    self.last_press_at = Some(now_ms);

    if within_window {
      return self.enqueue(direction);
    }
    if self.tail() == Some(direction) {
      return false;
    }
    self.pending.clear();
    self.pending.push_back(direction);
    true
  }

  /// Pops intents until one is legal against `heading`. Reversals are
  /// dropped. Falls back to `heading` when the queue runs dry.
  pub fn resolve_next(&mut self, heading: Direction) -> Direction {
    while let Some(candidate) = self.pending.pop_front() {
      if candidate.is_reversal_of(heading) {
        tracing::trace!(%candidate, %heading, "dropped reversal");
        continue;
      }
      return candidate;
    }
    heading
  }
}

impl FromIterator<Direction> for InputQueue {
  fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
    let mut queue = InputQueue::new();
    for direction in iter {
      queue.enqueue(direction);
    }
    queue
  }
}
