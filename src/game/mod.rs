pub mod clock;
pub mod constants;
pub mod engine;
pub mod geometry;
pub mod input;
pub mod types;

pub use clock::TickClock;
pub use engine::{step, DeathCause, GameState, StepEvent, StepResult};
pub use input::InputQueue;
pub use types::{Cell, Direction, Segment, Snake};
