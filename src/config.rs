//! Game parameters and server settings, read from the environment.

use crate::game::constants::{
  BASE_TICK_MS, GRID_SIZE, GROWTH_FACTOR, INPUT_WINDOW_MS, MIN_GRID_SIZE, PIXEL_SIZE,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Pure game parameters shared by every client in a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
  pub grid_size: i32,
  pub pixel_size: u32,
  #[serde(rename = "baseTickDuration")]
  pub base_tick_ms: f64,
  pub growth_factor: f64,
  #[serde(rename = "inputWindow")]
  pub input_window_ms: u64,
}

impl Default for GameConfig {
  fn default() -> Self {
    Self {
      grid_size: GRID_SIZE,
      pixel_size: PIXEL_SIZE,
      base_tick_ms: BASE_TICK_MS,
      growth_factor: GROWTH_FACTOR,
      input_window_ms: INPUT_WINDOW_MS,
    }
  }
}

impl GameConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    let defaults = Self::default();
    let config = Self {
      grid_size: env_or("SNAKE_GRID_SIZE", defaults.grid_size),
      pixel_size: env_or("SNAKE_PIXEL_SIZE", defaults.pixel_size),
      base_tick_ms: env_or("SNAKE_BASE_TICK_MS", defaults.base_tick_ms),
      growth_factor: env_or("SNAKE_GROWTH_FACTOR", defaults.growth_factor),
      input_window_ms: env_or("SNAKE_INPUT_WINDOW_MS", defaults.input_window_ms),
    };
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.grid_size < MIN_GRID_SIZE {
      return Err(ConfigError::GridTooSmall(self.grid_size));
    }
    if !self.base_tick_ms.is_finite() || self.base_tick_ms <= 0.0 {
      return Err(ConfigError::InvalidTickDuration(self.base_tick_ms));
    }
    if !(self.growth_factor > 0.0 && self.growth_factor <= 1.0) {
      return Err(ConfigError::InvalidGrowthFactor(self.growth_factor));
    }
    Ok(())
  }
}

/// Settings for the relay/score server binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
  pub port: u16,
  pub database_url: String,
  pub game: GameConfig,
}

impl ServerConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
      let base = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
      let default_path = base.join("data").join("scores.db");
      format!("sqlite://{}", default_path.display())
    });

    Ok(Self {
      port: env_or("PORT", 9898),
      database_url,
      game: GameConfig::from_env()?,
    })
  }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("grid size {0} is too small, need at least 4")]
  GridTooSmall(i32),

  #[error("base tick duration must be a positive number of milliseconds, got {0}")]
  InvalidTickDuration(f64),

  #[error("growth factor must be in (0, 1], got {0}")]
  InvalidGrowthFactor(f64),
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
  env::var(key)
    .ok()
    .and_then(|value| value.trim().parse().ok())
    .unwrap_or(default)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_are_valid() {
    assert!(GameConfig::default().validate().is_ok());
  }

  #[test]
  fn rejects_out_of_range_parameters() {
    let small = GameConfig {
      grid_size: 3,
      ..GameConfig::default()
    };
    assert!(matches!(small.validate(), Err(ConfigError::GridTooSmall(3))));

    let frozen = GameConfig {
      base_tick_ms: 0.0,
      ..GameConfig::default()
    };
    assert!(matches!(frozen.validate(), Err(ConfigError::InvalidTickDuration(_))));

    for factor in [0.0, 1.5, f64::NAN] {
      let config = GameConfig {
        growth_factor: factor,
        ..GameConfig::default()
      };
      assert!(matches!(config.validate(), Err(ConfigError::InvalidGrowthFactor(_))));
    }
  }

  #[test]
  fn serializes_with_client_field_names() {
    let value = serde_json::to_value(GameConfig::default()).unwrap();
    assert_eq!(value["gridSize"], 24);
    assert_eq!(value["pixelSize"], 20);
    assert_eq!(value["baseTickDuration"], 150.0);
    assert_eq!(value["growthFactor"], 0.97);
    assert_eq!(value["inputWindow"], 250);
  }
}
