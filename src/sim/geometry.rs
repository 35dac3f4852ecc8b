//! Planar geometry primitives for the collision solver
//!
//! Points and vectors are `DVec2`. Lines use the general form `a*x + b*y = c`.

use glam::{DMat2, DVec2};

use crate::consts::ERROR_MARGIN;

/// A straight segment between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: DVec2,
    pub end: DVec2,
}

impl Segment {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self { start, end }
    }

    /// Segment starting at `start` and covering `movement`
    pub fn from_move(start: DVec2, movement: DVec2) -> Self {
        Self::new(start, start + movement)
    }

    #[inline]
    pub fn direction(&self) -> DVec2 {
        self.end - self.start
    }

    /// Direction rotated by 90°. Orthogonal to the segment, unnormalized,
    /// with no promise about which side it faces.
    pub fn normal(&self) -> DVec2 {
        rotation_matrix(std::f64::consts::FRAC_PI_2) * self.direction()
    }

    /// Whether `point` lies in this segment's bounding box (with margin)
    #[inline]
    pub fn box_contains(&self, point: DVec2) -> bool {
        point_in_box(point, self.start, self.end)
    }

    pub fn line(&self) -> LineEquation {
        line_equation(self.start, self.end)
    }
}

/// Line `a*x + b*y = c`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineEquation {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl LineEquation {
    /// Coefficient row `(a, b)`
    #[inline]
    pub fn coefficients(&self) -> DVec2 {
        DVec2::new(self.a, self.b)
    }
}

/// Euclidean distance
#[inline]
pub fn distance(p1: DVec2, p2: DVec2) -> f64 {
    p1.distance(p2)
}

/// Line through two points
///
/// Non-vertical lines are normalized to `b = 1`, vertical ones to `a = 1`.
/// Coinciding points give the vertical line through them.
pub fn line_equation(p1: DVec2, p2: DVec2) -> LineEquation {
    let (a, b) = if p1.x != p2.x {
        (-(p1.y - p2.y) / (p1.x - p2.x), 1.0)
    } else if p1.y != p2.y {
        (1.0, -(p1.x - p2.x) / (p1.y - p2.y))
    } else {
        (1.0, 0.0)
    };
    LineEquation { a, b, c: a * p1.x + b * p1.y }
}

/// Inclusive containment in the axis-aligned box spanned by two corners,
/// widened by `ERROR_MARGIN` on every side
pub fn point_in_box(point: DVec2, corner1: DVec2, corner2: DVec2) -> bool {
    let min = corner1.min(corner2) - DVec2::splat(ERROR_MARGIN);
    let max = corner1.max(corner2) + DVec2::splat(ERROR_MARGIN);
    point.cmpge(min).all() && point.cmple(max).all()
}

/// Reflect `v` about the line orthogonal to `normal`
///
/// Standard reflection: v' = v - 2(v·n)n with n normalized.
/// `normal` must be non-zero.
#[inline]
pub fn mirror_vector(v: DVec2, normal: DVec2) -> DVec2 {
    let n = normal.normalize();
    v - 2.0 * n.dot(v) * n
}

/// Counter-clockwise rotation by `angle` radians
#[inline]
pub fn rotation_matrix(angle: f64) -> DMat2 {
    DMat2::from_angle(angle)
}
