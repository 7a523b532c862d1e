//! Grid snake: a tick-driven simulation with buffered direction input, plus
//! a small WebSocket relay that lets two clients steer each other's snakes.

pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod game;
pub mod protocol;
pub mod relay;
pub mod scores;
pub mod shared;
pub mod transport;
