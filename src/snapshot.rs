//! Outward-facing game state
//!
//! The only state a driver or transport needs: ball position, paddle positions
//! and score out, one desired move per paddle in. Framing is left to the caller.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// State published after each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Ball center
    pub ball: DVec2,
    /// Top-left corners of paddle 1 and paddle 2
    pub paddles: [DVec2; 2],
    /// Goals of the left and right side
    pub score: [u32; 2],
}

impl StateSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Input accepted for one paddle
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PaddleInput {
    pub desired_move: DVec2,
}

impl PaddleInput {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
