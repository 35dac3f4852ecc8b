//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied elapsed time only
//! - Stable surface enumeration order
//! - No rendering, transport or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod geometry;
pub mod state;
pub mod tick;

pub use collision::{
    Collision, Stadium, ball_rect_collision, closest_collision, resolve_collision,
    segment_vs_circle, segment_vs_segment,
};
pub use geometry::{
    LineEquation, Segment, distance, line_equation, mirror_vector, point_in_box,
    rotation_matrix,
};
pub use state::{Ball, Body, GameState, Outline, Paddle, ResolvedFlags, Score, Side, Surface};
pub use tick::{TickInput, TickReport, advance, tick};
