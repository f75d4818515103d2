//! Fixed gameplay parameters and the startup sanity check.

use std::env;
use std::path::PathBuf;

use log::LevelFilter;
use thiserror::Error;

use crate::Position;

/// Playing field size, in cells
pub const TILES_X: i32 = 40;
pub const TILES_Y: i32 = 30;

/// Step interval at the start of a session
pub const BASE_INTERVAL_MS: u64 = 150;
/// Speed food never pushes the interval below this
pub const MIN_INTERVAL_MS: u64 = 80;
pub const SPEED_STEP_MS: u64 = 10;

pub const START_HEAD: Position = (20, 15);
pub const START_LENGTH: usize = 3;

pub const SHIELD_TICKS: u32 = 300;
pub const MAGNET_TICKS: u32 = 600;
/// Squared Euclidean radius (exclusive) of the magnet pull
pub const MAGNET_RANGE_SQ: i32 = 3 * 3;

pub const INITIAL_FOOD: usize = 3;
pub const OBSTACLE_COUNT: usize = 8;
/// Inclusive cell rectangle kept free of obstacles: ((min_x, min_y), (max_x, max_y))
pub const SAFE_ZONE: (Position, Position) = ((15, 15), (25, 20));

pub const POWER_UP_SPAWN_TICKS: u32 = 500;
pub const MAX_POWER_UPS: usize = 2;

pub const NORMAL_FOOD_CHANCE: f64 = 0.7;
/// Chance of golden among the non-normal food
pub const GOLDEN_FOOD_CHANCE: f64 = 0.8;
pub const SHIELD_CHANCE: f64 = 0.5;

pub const NORMAL_POINTS: u32 = 10;
pub const GOLDEN_POINTS: u32 = 25;
pub const SPEED_POINTS: u32 = 15;
pub const POWER_UP_POINTS: u32 = 50;

pub const FOOD_PARTICLES: usize = 8;
pub const EXPLOSION_PARTICLES: usize = 15;
pub const PARTICLE_LIFE: u32 = 30;
pub const PARTICLE_DAMPING: f32 = 0.95;
/// Full spread of a particle's initial velocity, in cells per tick
pub const PARTICLE_SPREAD: f32 = 0.4;

pub const STAR_COUNT: usize = 50;

pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

pub const SCORE_FILE_ENV: &str = "NEON_SNAKE_SCORES";
pub const DEFAULT_SCORE_FILE: &str = ".neon_snake_scores.json";
pub const LOG_LEVEL_ENV: &str = "NEON_SNAKE_LOG";
pub const LOG_FILE: &str = "neon_snake.log";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("starting snake at {head:?} (length {length}) does not fit the {width}x{height} grid")]
    StartOutOfBounds { head: Position, length: usize, width: i32, height: i32 },

    #[error("starting snake at {0:?} is outside the obstacle-free zone")]
    StartOutsideSafeZone(Position),

    #[error("not enough room for {what}: need {required} free cells, grid has {available}")]
    Crowded { what: &'static str, required: usize, available: usize },
}

/// Checks that the constants above describe a playable board. Run once at startup.
pub fn validate() -> Result<(), ConfigError> {
    check_layout(TILES_X, TILES_Y, START_HEAD, START_LENGTH, SAFE_ZONE)
}

fn check_layout(
    width: i32,
    height: i32,
    head: Position,
    length: usize,
    safe_zone: (Position, Position),
) -> Result<(), ConfigError> {
    // The start snake trails to the left of its head
    let tail_x = head.0 - (length as i32 - 1);
    if length == 0 || tail_x < 0 || head.0 >= width || head.1 < 0 || head.1 >= height {
        return Err(ConfigError::StartOutOfBounds { head, length, width, height });
    }

    let ((min_x, min_y), (max_x, max_y)) = safe_zone;
    if tail_x < min_x || head.0 > max_x || head.1 < min_y || head.1 > max_y {
        return Err(ConfigError::StartOutsideSafeZone(head));
    }

    let cells = (width * height) as usize;
    let zone_cells = ((max_x - min_x + 1).max(0) * (max_y - min_y + 1).max(0)) as usize;
    check_room("obstacles", OBSTACLE_COUNT, cells.saturating_sub(zone_cells))?;
    check_room(
        "food and power-ups",
        INITIAL_FOOD + MAX_POWER_UPS + length,
        cells.saturating_sub(OBSTACLE_COUNT),
    )
}

fn check_room(what: &'static str, required: usize, available: usize) -> Result<(), ConfigError> {
    // Rejection sampling needs slack, not an exact fit
    if required * 2 > available {
        return Err(ConfigError::Crowded { what, required, available });
    }
    Ok(())
}

pub fn score_file() -> PathBuf {
    env::var_os(SCORE_FILE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCORE_FILE))
}

pub fn log_level() -> LevelFilter {
    env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_is_valid() {
        assert_eq!(validate(), Ok(()));
    }

    #[test]
    fn start_snake_must_fit_the_grid() {
        let err = check_layout(40, 30, (1, 15), 3, ((0, 0), (39, 29))).unwrap_err();
        assert!(matches!(err, ConfigError::StartOutOfBounds { .. }));

        let err = check_layout(40, 30, (20, 30), 3, ((0, 0), (39, 29))).unwrap_err();
        assert!(matches!(err, ConfigError::StartOutOfBounds { .. }));
    }

    #[test]
    fn start_snake_must_sit_in_the_safe_zone() {
        let err = check_layout(40, 30, (5, 5), 3, SAFE_ZONE).unwrap_err();
        assert_eq!(err, ConfigError::StartOutsideSafeZone((5, 5)));
    }

    #[test]
    fn tiny_grid_is_too_crowded() {
        let err = check_layout(4, 4, (2, 1), 3, ((0, 0), (3, 1))).unwrap_err();
        assert!(matches!(err, ConfigError::Crowded { what: "obstacles", .. }));
    }
}
