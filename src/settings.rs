//! Game settings
//!
//! Field layout, entity defaults and simulation limits. Loaded from a JSON file
//! by the driver; every field falls back to its default when omitted.

use std::fs;
use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// Gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Field ===
    /// Playing field (width, height); y grows downward
    pub field_size: DVec2,
    /// Paddle (width, height)
    pub paddle_size: DVec2,

    // === Ball ===
    pub ball_radius: f64,
    pub ball_start_position: DVec2,
    pub ball_start_velocity: DVec2,

    // === Simulation ===
    /// Displacement per millisecond per unit of velocity
    pub velocity_scale: f64,
    /// Sweep iterations per tick before `SweepNotConverging`
    pub max_sweep_iterations: usize,

    // === Driver ===
    /// Fixed ticks per second
    pub tick_rate: u32,
    /// Autopilot paddle speed (pixels per tick)
    pub autopilot_max_step: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_size: DVec2::from(FIELD_SIZE),
            paddle_size: DVec2::from(PADDLE_SIZE),

            ball_radius: BALL_RADIUS,
            ball_start_position: DVec2::from(BALL_START_POS),
            ball_start_velocity: DVec2::from(BALL_START_VEL),

            velocity_scale: VELOCITY_SCALE,
            max_sweep_iterations: MAX_SWEEP_ITERATIONS,

            tick_rate: TICK_RATE,
            autopilot_max_step: AUTOPILOT_MAX_STEP,
        }
    }
}

impl Settings {
    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Fixed tick length in milliseconds
    #[inline]
    pub fn tick_ms(&self) -> f64 {
        1000.0 / self.tick_rate as f64
    }

    /// Reject layouts the simulation cannot run
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |msg: String| Err(SettingsError::Invalid(msg));

        if !(self.field_size.x > 0.0 && self.field_size.y > 0.0) {
            return invalid(format!("field size must be positive, got {}", self.field_size));
        }
        if !(self.paddle_size.x > 0.0 && self.paddle_size.y > 0.0) {
            return invalid(format!("paddle size must be positive, got {}", self.paddle_size));
        }
        if self.paddle_size.y > self.field_size.y || 2.0 * self.paddle_size.x >= self.field_size.x {
            return invalid(format!(
                "paddles {} do not fit the field {}",
                self.paddle_size, self.field_size
            ));
        }
        if !(self.ball_radius > 0.0) || 2.0 * self.ball_radius >= self.field_size.min_element() {
            return invalid(format!("ball radius {} does not fit the field", self.ball_radius));
        }
        let min = DVec2::splat(self.ball_radius);
        let max = self.field_size - min;
        if self.ball_start_position.cmplt(min).any() || self.ball_start_position.cmpgt(max).any() {
            return invalid(format!(
                "ball start {} is outside the playable area",
                self.ball_start_position
            ));
        }
        if !self.ball_start_velocity.is_finite() || !self.velocity_scale.is_finite() {
            return invalid("ball velocity and scale must be finite".to_string());
        }
        if self.max_sweep_iterations == 0 {
            return invalid("max_sweep_iterations must be at least 1".to_string());
        }
        if self.tick_rate == 0 {
            return invalid("tick_rate must be positive".to_string());
        }
        if !(self.autopilot_max_step >= 0.0) {
            return invalid(format!(
                "autopilot_max_step must be non-negative, got {}",
                self.autopilot_max_step
            ));
        }
        Ok(())
    }
}
