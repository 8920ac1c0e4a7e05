use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::{Error, Result};

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_FALL_INTERVAL_MS: u64 = 250;
pub const MIN_FALL_INTERVAL_MS: u64 = 120;
pub const SPEEDUP_PERIOD_MS: u64 = 5_000;
pub const SPEEDUP_STEP_MS: u64 = 5;
pub const LEVEL_UP_FACTOR: f64 = 0.75;
pub const DEFAULT_FPS: u32 = 60;

// ============================================================================
// Game Config
// ============================================================================

/// Timing knobs for the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    /// Gravity interval at level 0.
    pub initial_fall_interval: Duration,
    /// Floor for both speed ramps.
    pub min_fall_interval: Duration,
    /// Simulated time between small interval reductions.
    pub speedup_period: Duration,
    /// Amount shaved off the interval every `speedup_period`.
    pub speedup_step: Duration,
    /// Interval multiplier applied on each level up.
    pub level_up_factor: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_fall_interval: Duration::from_millis(DEFAULT_FALL_INTERVAL_MS),
            min_fall_interval: Duration::from_millis(MIN_FALL_INTERVAL_MS),
            speedup_period: Duration::from_millis(SPEEDUP_PERIOD_MS),
            speedup_step: Duration::from_millis(SPEEDUP_STEP_MS),
            level_up_factor: LEVEL_UP_FACTOR,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_fall_interval.is_zero() {
            return Err(Error::Config("minimum fall interval must be positive".into()));
        }
        if self.initial_fall_interval < self.min_fall_interval {
            return Err(Error::Config(format!(
                "fall interval {}ms is below the {}ms floor",
                self.initial_fall_interval.as_millis(),
                self.min_fall_interval.as_millis()
            )));
        }
        if self.speedup_period.is_zero() {
            return Err(Error::Config("speedup period must be positive".into()));
        }
        if !(self.level_up_factor > 0.0 && self.level_up_factor <= 1.0) {
            return Err(Error::Config(format!(
                "level up factor {} must be in (0, 1]",
                self.level_up_factor
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Command Line
// ============================================================================

/// blockfall - falling block puzzle in the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Seed for the piece generator (random if omitted)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Frames per second of the main loop
    #[arg(long, default_value_t = DEFAULT_FPS)]
    pub fps: u32,

    /// Gravity interval at level 0, in milliseconds
    #[arg(long, default_value_t = DEFAULT_FALL_INTERVAL_MS)]
    pub fall_interval_ms: u64,

    /// Write tracing output to this file
    #[arg(short, long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn game_config(&self) -> Result<GameConfig> {
        let config = GameConfig {
            initial_fall_interval: Duration::from_millis(self.fall_interval_ms),
            ..GameConfig::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn frame_duration(&self) -> Result<Duration> {
        if self.fps == 0 {
            return Err(Error::Config("fps must be positive".into()));
        }
        Ok(Duration::from_secs(1) / self.fps)
    }
}
