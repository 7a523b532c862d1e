use super::types::{Cell, Direction, Segment};

pub fn vector_of(direction: Direction) -> (i32, i32) {
  match direction {
    Direction::Up => (0, -1),
    Direction::Down => (0, 1),
    Direction::Left => (-1, 0),
    Direction::Right => (1, 0),
  }
}

pub fn offset(cell: Cell, direction: Direction) -> Cell {
  let (dx, dy) = vector_of(direction);
  Cell {
    x: cell.x + dx,
    y: cell.y + dy,
  }
}

pub fn same_cell(a: Cell, b: Cell) -> bool {
  a.x == b.x && a.y == b.y
}

pub fn any_collision(a: &[Cell], b: &[Cell]) -> bool {
  a.iter().any(|left| b.iter().any(|right| same_cell(*left, *right)))
}

/// True when two segments at different indices share a cell.
pub fn self_collision(snake: &[Segment]) -> bool {
  for (i, segment) in snake.iter().enumerate() {
    for other in &snake[i + 1..] {
      if same_cell(segment.cell, other.cell) {
        return true;
      }
    }
  }
  false
}

pub fn in_bounds(cell: Cell, grid_size: i32) -> bool {
  cell.x >= 0 && cell.y >= 0 && cell.x < grid_size && cell.y < grid_size
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn vectors_are_unit_and_distinct() {
    let vectors: Vec<(i32, i32)> = Direction::ALL.iter().map(|d| vector_of(*d)).collect();
    for (i, (dx, dy)) in vectors.iter().enumerate() {
      assert_eq!(dx.abs() + dy.abs(), 1);
      assert!(!vectors[i + 1..].contains(&(*dx, *dy)));
    }
    for direction in Direction::ALL {
      let (dx, dy) = vector_of(direction);
      assert_eq!(vector_of(direction.opposite()), (-dx, -dy));
    }
  }

  #[test]
  fn any_collision_is_order_independent() {
    let a = [Cell::new(0, 0), Cell::new(3, 4)];
    let b = [Cell::new(9, 9), Cell::new(3, 4)];
    let c = [Cell::new(1, 1)];
    assert!(any_collision(&a, &b));
    assert!(any_collision(&b, &a));
    assert!(!any_collision(&a, &c));
    assert!(!any_collision(&a, &[]));
  }

  #[test]
  fn self_collision_compares_distinct_indices() {
    let clean = vec![
      Segment::new(2, 0, Direction::Right),
      Segment::new(1, 0, Direction::Right),
      Segment::new(0, 0, Direction::Right),
    ];
    assert!(!self_collision(&clean));

    let mut tangled = clean.clone();
    tangled.push(Segment::new(1, 0, Direction::Up));
    assert!(self_collision(&tangled));
    assert!(!self_collision(&clean[..1]));
  }

  #[test]
  fn bounds_are_half_open() {
    assert!(in_bounds(Cell::new(0, 0), 24));
    assert!(in_bounds(Cell::new(23, 23), 24));
    assert!(!in_bounds(Cell::new(-1, 0), 24));
    assert!(!in_bounds(Cell::new(0, 24), 24));
  }
}
