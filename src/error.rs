//! Error types for the simulation and its configuration
//!
//! Everything that is not listed here (no collision, paddle free to move,
//! parallel lines) is ordinary control flow.

use std::path::PathBuf;

use glam::DVec2;
use thiserror::Error;

/// Fatal simulation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Line solver received two all-zero coefficient rows
    #[error("degenerate geometry in {context}: coefficient matrix has zero rank")]
    DegenerateInput {
        /// Operation that hit the degenerate system
        context: &'static str,
    },

    /// Sweep loop kept finding collisions past its iteration cap
    #[error("ball sweep did not converge after {iterations} iterations (at {position})")]
    SweepNotConverging {
        /// Iterations run before giving up
        iterations: usize,
        /// Sweep start when the cap was hit
        position: DVec2,
    },
}

/// Settings loading and validation errors
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Settings file could not be read or written
    #[error("settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings JSON is malformed
    #[error("settings parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Settings parsed but describe an unplayable field
    #[error("invalid settings: {0}")]
    Invalid(String),
}
