//! Computer-controlled paddles
//!
//! Follows the ball's height at a limited speed, so a fast enough ball can
//! still get past.

use glam::DVec2;

use super::state::{Ball, Paddle};
use crate::settings::Settings;

/// Desired move that centers `paddle` on the ball's height
///
/// The target stays inside the field and the step is limited to
/// `settings.autopilot_max_step`.
pub fn track_ball(paddle: &Paddle, ball: &Ball, settings: &Settings) -> DVec2 {
    let limit = (settings.field_size.y - paddle.size.y).max(0.0);
    let target_y = (ball.pos.y - paddle.size.y * 0.5).clamp(0.0, limit);
    let step = settings.autopilot_max_step;
    DVec2::new(0.0, (target_y - paddle.pos.y).clamp(-step, step))
}
