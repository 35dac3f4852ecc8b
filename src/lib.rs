//! Sweep Pong - two-paddle Pong with swept collisions
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, collisions, sweep loop, game state)
//! - `settings`: Data-driven game configuration
//! - `snapshot`: Outward-facing state for drivers and transports
//! - `error`: Simulation and configuration errors

pub mod error;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use error::{SettingsError, SimError};
pub use settings::Settings;
pub use snapshot::{PaddleInput, StateSnapshot};

/// Game configuration constants
pub mod consts {
    /// Box containment slack. Matrix solves land ~1e-15 off horizontal and
    /// vertical segments; without this the contact is dropped and the ball tunnels.
    pub const ERROR_MARGIN: f64 = 1e-10;
    /// Two parallel lines whose constants differ by less than this coincide
    pub const COINCIDENCE_TOLERANCE: f64 = 1e-5;

    /// Playing field (width, height)
    pub const FIELD_SIZE: (f64, f64) = (500.0, 300.0);
    /// Paddle (width, height)
    pub const PADDLE_SIZE: (f64, f64) = (10.0, 60.0);

    /// Ball defaults
    pub const BALL_RADIUS: f64 = 10.0;
    pub const BALL_START_POS: (f64, f64) = (250.0, 150.0);
    pub const BALL_START_VEL: (f64, f64) = (-1.0, 1.0);

    /// Displacement per millisecond of elapsed time per unit of velocity
    pub const VELOCITY_SCALE: f64 = 0.1;
    /// Sweep iterations allowed in a single tick before giving up
    pub const MAX_SWEEP_ITERATIONS: usize = 64;

    /// Driver tick rate (Hz)
    pub const TICK_RATE: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Autopilot paddle speed (pixels per tick)
    pub const AUTOPILOT_MAX_STEP: f64 = 1.2;
}
