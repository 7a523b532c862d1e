pub const GRID_SIZE: i32 = 24;
pub const PIXEL_SIZE: u32 = 20;
pub const BASE_TICK_MS: f64 = 150.0;
pub const GROWTH_FACTOR: f64 = 0.97;
pub const INPUT_WINDOW_MS: u64 = 250;
pub const STARTING_LENGTH: usize = 3;
pub const MIN_GRID_SIZE: i32 = 4;
pub const RANDOM_APPLE_ATTEMPTS: usize = 64;
pub const FRAME_INTERVAL_MS: u64 = 16;
