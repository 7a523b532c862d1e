use crate::error::DirectionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
  pub x: i32,
  pub y: i32,
}

impl Cell {
  pub const fn new(x: i32, y: i32) -> Self {
    Self { x, y }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Direction {
  Up,
  Down,
  Left,
  Right,
}

impl Direction {
  pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

  pub fn opposite(self) -> Self {
    match self {
      Direction::Up => Direction::Down,
      Direction::Down => Direction::Up,
      Direction::Left => Direction::Right,
      Direction::Right => Direction::Left,
    }
  }

  pub fn is_reversal_of(self, heading: Direction) -> bool {
    self == heading.opposite()
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Direction::Up => "UP",
      Direction::Down => "DOWN",
      Direction::Left => "LEFT",
      Direction::Right => "RIGHT",
    }
  }
}

impl fmt::Display for Direction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Direction {
  type Err = DirectionError;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value.trim().to_ascii_uppercase().as_str() {
      "UP" => Ok(Direction::Up),
      "DOWN" => Ok(Direction::Down),
      "LEFT" => Ok(Direction::Left),
      "RIGHT" => Ok(Direction::Right),
      _ => Err(DirectionError::Invalid(value.to_string())),
    }
  }
}

impl TryFrom<String> for Direction {
  type Error = DirectionError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<Direction> for &'static str {
  fn from(value: Direction) -> Self {
    value.as_str()
  }
}

/// One body part. `heading` is the direction it moved on its last advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
  pub cell: Cell,
  pub heading: Direction,
}

impl Segment {
  pub const fn new(x: i32, y: i32, heading: Direction) -> Self {
    Self {
      cell: Cell::new(x, y),
      heading,
    }
  }
}

/// Head first.
pub type Snake = Vec<Segment>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn opposite_pairs_are_symmetric() {
    for direction in Direction::ALL {
      assert_eq!(direction.opposite().opposite(), direction);
      assert!(direction.opposite().is_reversal_of(direction));
      assert!(!direction.is_reversal_of(direction));
    }
  }

  #[test]
  fn parse_accepts_any_case_and_rejects_unknown() {
    assert_eq!("up".parse::<Direction>().unwrap(), Direction::Up);
    assert_eq!("RIGHT".parse::<Direction>().unwrap(), Direction::Right);
    assert_eq!(" Left ".parse::<Direction>().unwrap(), Direction::Left);
    let err = "north".parse::<Direction>().unwrap_err();
    assert_eq!(err.to_string(), "invalid direction: north");
  }

  #[test]
  fn serde_uses_uppercase_names() {
    let json = serde_json::to_string(&Direction::Down).unwrap();
    assert_eq!(json, "\"DOWN\"");
    let parsed: Direction = serde_json::from_str("\"left\"").unwrap();
    assert_eq!(parsed, Direction::Left);
    assert!(serde_json::from_str::<Direction>("\"sideways\"").is_err());
  }
}
