//! Game state and core simulation types
//!
//! The ball and both paddles are created once per match and mutated in place
//! every tick. A goal resets them; the score survives.

use glam::DVec2;

use super::geometry::Segment;
use crate::error::SettingsError;
use crate::settings::Settings;
use crate::snapshot::StateSnapshot;

/// A player side; paddle 1 defends the left wall, paddle 2 the right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Surfaces the ball can strike, in the order they are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    LeftWall,
    TopWall,
    RightWall,
    BottomWall,
    Paddle1,
    Paddle2,
}

impl Surface {
    /// Enumeration order; also the tie-break order for equidistant hits
    pub const ALL: [Surface; 6] = [
        Surface::LeftWall,
        Surface::TopWall,
        Surface::RightWall,
        Surface::BottomWall,
        Surface::Paddle1,
        Surface::Paddle2,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Side that scores when the ball reaches this surface
    pub fn goal_for(self) -> Option<Side> {
        match self {
            Surface::LeftWall => Some(Side::Right),
            Surface::RightWall => Some(Side::Left),
            _ => None,
        }
    }

    /// Paddle index for paddle surfaces
    pub fn paddle(self) -> Option<usize> {
        match self {
            Surface::Paddle1 => Some(0),
            Surface::Paddle2 => Some(1),
            _ => None,
        }
    }
}

/// One-shot skip flags, one per surface
///
/// A surface is flagged right after its collision is resolved. The next check
/// of that surface consumes the flag instead of testing it, so round-off at the
/// contact point cannot bounce the ball off the same surface again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvedFlags([bool; 6]);

impl ResolvedFlags {
    #[inline]
    pub fn mark(&mut self, surface: Surface) {
        self.0[surface.index()] = true;
    }

    /// Clear the flag and report whether it was set
    #[inline]
    pub fn take(&mut self, surface: Surface) -> bool {
        std::mem::take(&mut self.0[surface.index()])
    }

    #[inline]
    pub fn is_set(&self, surface: Surface) -> bool {
        self.0[surface.index()]
    }

    pub fn clear(&mut self) {
        self.0 = [false; 6];
    }
}

/// Drawable outline of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outline {
    Circle { center: DVec2, radius: f64 },
    Rect { top_left: DVec2, size: DVec2 },
}

/// Shared capabilities of everything on the field
pub trait Body {
    fn position(&self) -> DVec2;
    fn velocity(&self) -> DVec2;
    fn outline(&self) -> Outline;
}

/// The ball
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    /// Center
    pub pos: DVec2,
    pub vel: DVec2,
    radius: f64,
}

impl Ball {
    pub fn new(pos: DVec2, vel: DVec2, radius: f64) -> Self {
        Self { pos, vel, radius }
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Body for Ball {
    fn position(&self) -> DVec2 {
        self.pos
    }

    fn velocity(&self) -> DVec2 {
        self.vel
    }

    fn outline(&self) -> Outline {
        Outline::Circle {
            center: self.pos,
            radius: self.radius,
        }
    }
}

/// A player's paddle
#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    /// Top-left corner
    pub pos: DVec2,
    pub size: DVec2,
    /// Requested displacement for the next tick; stops short of the ball
    pub desired_move: DVec2,
}

impl Paddle {
    pub fn new(pos: DVec2, size: DVec2) -> Self {
        Self {
            pos,
            size,
            desired_move: DVec2::ZERO,
        }
    }

    pub fn set_desired_move(&mut self, movement: DVec2) {
        self.desired_move = movement;
    }

    /// Request a vertical move so the top edge lands at `target_y`,
    /// kept inside a field of `field_height`
    pub fn aim_at(&mut self, target_y: f64, field_height: f64) {
        let limit = (field_height - self.size.y).max(0.0);
        let target_y = target_y.clamp(0.0, limit);
        self.desired_move = DVec2::new(0.0, target_y - self.pos.y);
    }

    pub fn move_by(&mut self, delta: DVec2) {
        self.pos += delta;
    }

    /// Point of the paddle rectangle closest to `point`
    pub fn closest_point(&self, point: DVec2) -> DVec2 {
        point.clamp(self.pos, self.pos + self.size)
    }
}

impl Body for Paddle {
    fn position(&self) -> DVec2 {
        self.pos
    }

    fn velocity(&self) -> DVec2 {
        self.desired_move
    }

    fn outline(&self) -> Outline {
        Outline::Rect {
            top_left: self.pos,
            size: self.size,
        }
    }
}

/// Goals per side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score([u32; 2]);

impl Score {
    #[inline]
    pub fn get(&self, side: Side) -> u32 {
        self.0[side.index()]
    }

    pub fn add_goal(&mut self, side: Side) {
        self.0[side.index()] += 1;
    }

    #[inline]
    pub fn as_array(&self) -> [u32; 2] {
        self.0
    }
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub ball: Ball,
    /// Paddle 1 (left) and paddle 2 (right)
    pub paddles: [Paddle; 2],
    pub score: Score,
    /// Persisted across ticks
    pub resolved: ResolvedFlags,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    pub fn new(settings: Settings) -> Self {
        let ball = Ball::new(
            settings.ball_start_position,
            settings.ball_start_velocity,
            settings.ball_radius,
        );
        let paddles = Self::start_paddles(&settings);
        Self {
            settings,
            ball,
            paddles,
            score: Score::default(),
            resolved: ResolvedFlags::default(),
            time_ticks: 0,
        }
    }

    fn start_paddles(settings: &Settings) -> [Paddle; 2] {
        let size = settings.paddle_size;
        [
            Paddle::new(DVec2::ZERO, size),
            Paddle::new(DVec2::new(settings.field_size.x - size.x, 0.0), size),
        ]
    }

    /// Field boundaries as seen by the ball center, in `Surface` order
    /// (left, top, right, bottom)
    pub fn walls(&self) -> [Segment; 4] {
        field_walls(self.settings.field_size, self.ball.radius())
    }

    /// Swap in a ball of a different radius; walls and stadiums follow it
    ///
    /// The radius goes through the same checks as loaded settings. On error the
    /// state is unchanged.
    pub fn set_ball_radius(&mut self, radius: f64) -> Result<(), SettingsError> {
        let mut settings = self.settings.clone();
        settings.ball_radius = radius;
        settings.validate()?;
        self.settings = settings;
        self.ball = Ball::new(self.ball.pos, self.ball.vel, radius);
        Ok(())
    }

    /// Put ball and paddles back at their start and clear all flags
    pub fn reset_entities(&mut self) {
        self.ball.pos = self.settings.ball_start_position;
        self.ball.vel = self.settings.ball_start_velocity;
        self.paddles = Self::start_paddles(&self.settings);
        self.resolved.clear();
    }

    /// Credit a goal and restart the rally
    pub fn handle_goal(&mut self, scorer: Side) {
        self.score.add_goal(scorer);
        log::info!(
            "Goal for {:?}! Score {}:{}",
            scorer,
            self.score.get(Side::Left),
            self.score.get(Side::Right)
        );
        self.reset_entities();
    }

    /// Outward-facing state
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            ball: self.ball.position(),
            paddles: [self.paddles[0].position(), self.paddles[1].position()],
            score: self.score.as_array(),
        }
    }
}

/// Walls of a `field_size` field for a ball of `radius`, inset by the radius
pub fn field_walls(field_size: DVec2, radius: f64) -> [Segment; 4] {
    let (w, h, r) = (field_size.x, field_size.y, radius);
    [
        Segment::new(DVec2::new(r, r), DVec2::new(r, h - r)),
        Segment::new(DVec2::new(r, r), DVec2::new(w - r, r)),
        Segment::new(DVec2::new(w - r, r), DVec2::new(w - r, h - r)),
        Segment::new(DVec2::new(r, h - r), DVec2::new(w - r, h - r)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_layout() {
        let state = GameState::new(Settings::default());
        assert_eq!(state.ball.pos, DVec2::new(250.0, 150.0));
        assert_eq!(state.ball.vel, DVec2::new(-1.0, 1.0));
        assert_eq!(state.paddles[0].pos, DVec2::ZERO);
        assert_eq!(state.paddles[1].pos, DVec2::new(490.0, 0.0));
        assert_eq!(state.score.as_array(), [0, 0]);
    }

    #[test]
    fn test_flags_are_one_shot() {
        let mut flags = ResolvedFlags::default();
        flags.mark(Surface::Paddle2);
        assert!(flags.is_set(Surface::Paddle2));
        assert!(flags.take(Surface::Paddle2));
        assert!(!flags.take(Surface::Paddle2));
        assert!(!flags.take(Surface::LeftWall));
    }

    #[test]
    fn test_flags_are_per_instance() {
        let mut a = GameState::new(Settings::default());
        let b = GameState::new(Settings::default());
        a.resolved.mark(Surface::TopWall);
        a.paddles[0].set_desired_move(DVec2::new(0.0, 5.0));
        assert!(!b.resolved.is_set(Surface::TopWall));
        assert_eq!(b.paddles[0].desired_move, DVec2::ZERO);
    }

    #[test]
    fn test_goal_resets_entities_keeps_score() {
        let mut state = GameState::new(Settings::default());
        state.ball.pos = DVec2::new(12.0, 40.0);
        state.ball.vel = DVec2::new(3.0, -2.0);
        state.paddles[1].pos.y = 120.0;
        state.paddles[0].set_desired_move(DVec2::new(0.0, 9.0));
        state.resolved.mark(Surface::BottomWall);

        state.handle_goal(Side::Right);

        assert_eq!(state.score.get(Side::Right), 1);
        assert_eq!(state.score.get(Side::Left), 0);
        assert_eq!(state.ball.pos, DVec2::new(250.0, 150.0));
        assert_eq!(state.ball.vel, DVec2::new(-1.0, 1.0));
        assert_eq!(state.paddles[1].pos, DVec2::new(490.0, 0.0));
        assert_eq!(state.paddles[0].desired_move, DVec2::ZERO);
        assert_eq!(state.resolved, ResolvedFlags::default());
    }

    #[test]
    fn test_walls_follow_ball_radius() {
        let mut state = GameState::new(Settings::default());
        assert_eq!(state.walls()[0].start, DVec2::new(10.0, 10.0));
        state.set_ball_radius(4.0).unwrap();
        let walls = state.walls();
        assert_eq!(walls[0], Segment::new(DVec2::new(4.0, 4.0), DVec2::new(4.0, 296.0)));
        assert_eq!(walls[2].start.x, 496.0);
        assert_eq!(walls[3].start.y, 296.0);
    }

    #[test]
    fn test_rejects_non_positive_ball_radius() {
        let mut state = GameState::new(Settings::default());
        for radius in [0.0, -3.0, f64::NAN] {
            assert!(matches!(
                state.set_ball_radius(radius),
                Err(SettingsError::Invalid(_))
            ));
        }
        assert_eq!(state.ball.radius(), 10.0);
        assert_eq!(state.settings.ball_radius, 10.0);
        assert_eq!(state.walls()[0].start, DVec2::new(10.0, 10.0));
    }

    #[test]
    fn test_aim_at_clamps_to_field() {
        let mut paddle = Paddle::new(DVec2::new(0.0, 100.0), DVec2::new(10.0, 60.0));
        paddle.aim_at(500.0, 300.0);
        assert_eq!(paddle.desired_move, DVec2::new(0.0, 140.0));
        paddle.aim_at(-20.0, 300.0);
        assert_eq!(paddle.desired_move, DVec2::new(0.0, -100.0));
    }

    #[test]
    fn test_body_outlines() {
        let state = GameState::new(Settings::default());
        assert_eq!(
            state.ball.outline(),
            Outline::Circle {
                center: DVec2::new(250.0, 150.0),
                radius: 10.0
            }
        );
        let paddle: &dyn Body = &state.paddles[1];
        assert_eq!(
            paddle.outline(),
            Outline::Rect {
                top_left: DVec2::new(490.0, 0.0),
                size: DVec2::new(10.0, 60.0)
            }
        );
        assert_eq!(paddle.velocity(), DVec2::ZERO);
    }

    #[test]
    fn test_surface_goals() {
        assert_eq!(Surface::LeftWall.goal_for(), Some(Side::Right));
        assert_eq!(Surface::RightWall.goal_for(), Some(Side::Left));
        assert_eq!(Surface::Paddle1.goal_for(), None);
        assert_eq!(Surface::Paddle2.paddle(), Some(1));
        assert_eq!(Side::Left.opponent(), Side::Right);
    }
}
