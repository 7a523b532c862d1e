/// Turns irregular frame deltas into discrete ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickClock {
  elapsed_ms: f64,
}

impl TickClock {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn elapsed_ms(&self) -> f64 {
    self.elapsed_ms
  }

  /// Adds `delta_ms` and reports whether a tick is due at `speed_ms`.
  /// When it is, the accumulator restarts at zero and any overshoot is
  /// dropped, so one frame yields at most one tick.
  pub fn advance(&mut self, delta_ms: f64, speed_ms: f64) -> bool {
    if delta_ms.is_finite() && delta_ms > 0.0 {
      self.elapsed_ms += delta_ms;
    }
    if !speed_ms.is_finite() {
      return false;
    }
    if self.elapsed_ms >= speed_ms {
      self.elapsed_ms = 0.0;
      return true;
    }
    false
  }

  /// Fraction of the current tick that has elapsed, in `[0, 1)`.
  pub fn progress(&self, speed_ms: f64) -> f64 {
    if !speed_ms.is_finite() || speed_ms <= 0.0 {
      return 0.0;
    }
    (self.elapsed_ms / speed_ms).clamp(0.0, 1.0 - f64::EPSILON)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fires_once_threshold_is_reached() {
    let mut clock = TickClock::new();
    assert!(!clock.advance(60.0, 150.0));
    assert!(!clock.advance(60.0, 150.0));
    assert!(clock.advance(60.0, 150.0));
    assert_eq!(clock.elapsed_ms(), 0.0);
  }

  #[test]
  fn overshoot_is_dropped() {
    let mut clock = TickClock::new();
    assert!(clock.advance(1_000.0, 150.0));
    assert_eq!(clock.elapsed_ms(), 0.0);
    assert!(!clock.advance(10.0, 150.0));
  }

  #[test]
  fn progress_tracks_accumulator() {
    let mut clock = TickClock::new();
    clock.advance(75.0, 150.0);
    assert!((clock.progress(150.0) - 0.5).abs() < 1e-9);
  }

  #[test]
  fn infinite_speed_never_ticks() {
    let mut clock = TickClock::new();
    for _ in 0..100 {
      assert!(!clock.advance(1_000.0, f64::INFINITY));
    }
    assert_eq!(clock.progress(f64::INFINITY), 0.0);
  }

  #[test]
  fn bad_deltas_are_ignored() {
    let mut clock = TickClock::new();
    clock.advance(-5.0, 150.0);
    clock.advance(f64::NAN, 150.0);
    assert_eq!(clock.elapsed_ms(), 0.0);
  }
}
