//! Per-tick simulation
//!
//! A tick first moves each paddle as far as it can without entering the ball,
//! then sweeps the ball through its whole displacement, bouncing off walls and
//! paddles until nothing is left of the move or a goal is scored.

use glam::DVec2;

use super::collision::{
    Collision, ball_rect_collision, closest_collision, resolve_collision, segment_vs_segment,
};
use super::geometry::{Segment, mirror_vector};
use super::state::{GameState, Side, Surface};
use crate::consts::ERROR_MARGIN;
use crate::error::SimError;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired displacement per paddle; `None` keeps whatever is already set
    pub paddle_moves: [Option<DVec2>; 2],
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Side that scored, if the ball reached a goal wall
    pub goal: Option<Side>,
    /// Surfaces the ball bounced off, in order
    pub resolved: Vec<Surface>,
    /// Sweep iterations used
    pub iterations: usize,
}

/// Apply input, then advance the game by `elapsed_ms`
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    elapsed_ms: f64,
) -> Result<TickReport, SimError> {
    for (paddle, movement) in state.paddles.iter_mut().zip(input.paddle_moves) {
        if let Some(movement) = movement {
            paddle.set_desired_move(movement);
        }
    }
    advance(state, elapsed_ms)
}

/// Advance the game by `elapsed_ms` milliseconds
///
/// The caller clamps `elapsed_ms`. On `SweepNotConverging` the ball keeps its
/// position, velocity and skip flags from the start of the tick.
pub fn advance(state: &mut GameState, elapsed_ms: f64) -> Result<TickReport, SimError> {
    state.time_ticks += 1;

    for index in 0..state.paddles.len() {
        paddle_physics(state, index)?;
    }
    ball_physics(state, elapsed_ms)
}

/// Move a paddle by its desired move, stopping just short of the ball
///
/// The paddle moving into the ball is the ball moving by the opposite vector
/// into a resting paddle.
fn paddle_physics(state: &mut GameState, index: usize) -> Result<(), SimError> {
    let ball_pos = state.ball.pos;
    let radius = state.ball.radius();
    let paddle = &mut state.paddles[index];
    let desired = std::mem::take(&mut paddle.desired_move);
    if desired == DVec2::ZERO {
        return Ok(());
    }

    let hits = ball_rect_collision(radius, paddle.pos, paddle.size, ball_pos, -desired)?;
    match closest_collision(ball_pos, &hits) {
        None => paddle.move_by(desired),
        Some((_, hit)) => {
            let blocked = ball_pos - hit.position;
            let allowed = DVec2::new(
                stop_short(blocked.x, desired.x),
                stop_short(blocked.y, desired.y),
            );
            log::debug!(
                "Paddle {} blocked by ball: wanted {}, moved {}",
                index + 1,
                desired,
                allowed
            );
            paddle.move_by(allowed);
        }
    }
    Ok(())
}

/// Blocked move along one axis, pulled back by `ERROR_MARGIN`. Axes the paddle
/// was not asked to move along stay put.
#[inline]
fn stop_short(blocked: f64, desired: f64) -> f64 {
    if desired == 0.0 || blocked == 0.0 {
        0.0
    } else {
        blocked - ERROR_MARGIN.copysign(blocked)
    }
}

/// Candidate collisions of one surface along `sweep`
fn surface_collisions(
    state: &GameState,
    surface: Surface,
    walls: &[Segment; 4],
    sweep: Segment,
) -> Result<Vec<Collision>, SimError> {
    match surface.paddle() {
        Some(index) => {
            let paddle = &state.paddles[index];
            ball_rect_collision(
                state.ball.radius(),
                paddle.pos,
                paddle.size,
                sweep.start,
                sweep.direction(),
            )
        }
        None => Ok(segment_vs_segment(sweep, walls[surface.index()])?
            .into_iter()
            .collect()),
    }
}

/// Sweep the ball through this tick's displacement
///
/// Works on a copy of the skip flags; they are written back only when the sweep
/// finishes without a goal.
fn ball_physics(state: &mut GameState, elapsed_ms: f64) -> Result<TickReport, SimError> {
    let walls = state.walls();
    let max_iterations = state.settings.max_sweep_iterations;

    let mut report = TickReport::default();
    let mut start = state.ball.pos;
    let mut movement = state.ball.vel * elapsed_ms * state.settings.velocity_scale;
    let mut velocity = state.ball.vel;
    let mut resolved = state.resolved;

    // Parallel lists: each hit and the surface it belongs to
    let mut hits: Vec<Collision> = Vec::new();
    let mut owners: Vec<Surface> = Vec::new();

    while movement != DVec2::ZERO {
        if report.iterations == max_iterations {
            log::error!(
                "Sweep gave up after {} iterations at {}, remaining move {}",
                report.iterations,
                start,
                movement
            );
            return Err(SimError::SweepNotConverging {
                iterations: report.iterations,
                position: start,
            });
        }
        report.iterations += 1;

        let sweep = Segment::from_move(start, movement);
        hits.clear();
        owners.clear();
        for surface in Surface::ALL {
            if resolved.take(surface) {
                continue;
            }
            let found = surface_collisions(state, surface, &walls, sweep)?;
            owners.extend(std::iter::repeat_n(surface, found.len()));
            hits.extend(found);
        }

        let Some((index, hit)) = closest_collision(start, &hits) else {
            break;
        };
        let surface = owners[index];

        if let Some(scorer) = surface.goal_for() {
            report.goal = Some(scorer);
            state.handle_goal(scorer);
            return Ok(report);
        }

        log::trace!("Ball hit {:?} at {}", surface, hit.position);
        movement = resolve_collision(start, movement, &hit);
        start = hit.position;
        velocity = mirror_vector(velocity, hit.normal);
        resolved.mark(surface);
        report.resolved.push(surface);
    }

    state.ball.pos = start + movement;
    state.ball.vel = velocity;
    state.resolved = resolved;
    Ok(report)
}
