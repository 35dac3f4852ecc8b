//! Swept collision detection and response
//!
//! The tricky part of Sweep Pong: the ball is never tested at a single
//! position. Its whole per-tick path is intersected with every surface, so a
//! fast ball cannot skip over a thin paddle.
//!
//! Ball vs rectangle is reduced to point vs stadium: the rectangle grown by the
//! ball radius, with quarter-circle corners.

use glam::{DMat2, DVec2};

use super::geometry::{Segment, distance, mirror_vector, point_in_box};
use crate::consts::COINCIDENCE_TOLERANCE;
use crate::error::SimError;

/// A contact found along a sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// Contact point on the swept path
    pub position: DVec2,
    /// Orthogonal to the struck surface, unnormalized. Orientation is not
    /// guaranteed for segment hits.
    pub normal: DVec2,
}

/// Intersect the swept path with a static segment
///
/// Returns at most one collision. For collinear overlapping segments the shared
/// endpoint closest to the sweep start is reported.
pub fn segment_vs_segment(sweep: Segment, target: Segment) -> Result<Option<Collision>, SimError> {
    let normal = target.normal();
    let swept_line = sweep.line();
    let target_line = target.line();

    // Rows are the two line equations
    let system = DMat2::from_cols(
        DVec2::new(swept_line.a, target_line.a),
        DVec2::new(swept_line.b, target_line.b),
    );
    let constants = DVec2::new(swept_line.c, target_line.c);

    if system.determinant() != 0.0 {
        let point = system.inverse() * constants;
        if sweep.box_contains(point) && target.box_contains(point) {
            return Ok(Some(Collision {
                position: point,
                normal,
            }));
        }
        return Ok(None);
    }

    // `line_equation` puts a 1 in every row, so the two errors below only fire
    // on non-finite coordinates
    let swept_row = swept_line.coefficients();
    let target_row = target_line.coefficients();
    if swept_row == DVec2::ZERO && target_row == DVec2::ZERO {
        return Err(SimError::DegenerateInput {
            context: "segment_vs_segment",
        });
    }

    // Dependent rows: scale the target equation onto the swept one
    let (numerator, denominator) = if swept_row.x.abs() >= swept_row.y.abs() {
        (swept_row.x, target_row.x)
    } else {
        (swept_row.y, target_row.y)
    };
    if numerator == 0.0 || denominator == 0.0 {
        return Err(SimError::DegenerateInput {
            context: "segment_vs_segment: zero coefficient row",
        });
    }
    let multiplier = numerator / denominator;

    if (swept_line.c - target_line.c * multiplier).abs() > COINCIDENCE_TOLERANCE {
        // Parallel, never touching
        return Ok(None);
    }

    // Same line: closest endpoint shared by both segments
    let position = [sweep.start, sweep.end, target.start, target.end]
        .into_iter()
        .filter(|&p| sweep.box_contains(p) && target.box_contains(p))
        .min_by(|&a, &b| distance(a, sweep.start).total_cmp(&distance(b, sweep.start)));

    Ok(position.map(|position| Collision { position, normal }))
}

/// Intersect the swept path with a circle
///
/// Returns 0 to 2 collisions; normals point from the center to the contact.
pub fn segment_vs_circle(sweep: Segment, center: DVec2, radius: f64) -> Vec<Collision> {
    let (x0, y0) = (center.x, center.y);
    let (x1, y1) = (sweep.start.x, sweep.start.y);
    let (x2, y2) = (sweep.end.x, sweep.end.y);

    let mut points: Vec<DVec2> = Vec::with_capacity(2);
    if x1 != x2 {
        // y = k*x + m substituted into (x - x0)² + (y - y0)² = r²
        let k = (y2 - y1) / (x2 - x1);
        let m = y1 - k * x1;

        let qa = k * k + 1.0;
        let qb = 2.0 * k * m - 2.0 * k * y0 - 2.0 * x0;
        let qc = x0 * x0 + (m - y0) * (m - y0) - radius * radius;
        let discriminant = qb * qb - 4.0 * qa * qc;

        let mut xs = Vec::with_capacity(2);
        if discriminant > 0.0 {
            let root = discriminant.sqrt();
            xs.push((-qb + root) / (2.0 * qa));
            xs.push((-qb - root) / (2.0 * qa));
        } else if discriminant == 0.0 {
            xs.push(-qb / (2.0 * qa));
        }
        points.extend(xs.into_iter().map(|x| DVec2::new(x, k * x + m)));
    } else {
        // Vertical path: y = y0 ± sqrt(r² - (x1 - x0)²)
        let rest = radius * radius - (x1 - x0) * (x1 - x0);
        if rest > 0.0 {
            let root = rest.sqrt();
            points.push(DVec2::new(x1, y0 + root));
            points.push(DVec2::new(x1, y0 - root));
        } else if rest == 0.0 {
            points.push(DVec2::new(x1, y0));
        }
    }

    points
        .into_iter()
        .filter(|&p| sweep.box_contains(p))
        .map(|position| Collision {
            position,
            normal: position - center,
        })
        .collect()
}

/// One rounded corner of a stadium
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub center: DVec2,
    pub radius: f64,
    /// Box holding the quarter of the circle that forms the corner
    pub quadrant: (DVec2, DVec2),
}

impl Corner {
    fn new(center: DVec2, radius: f64, outward: DVec2) -> Self {
        Self {
            center,
            radius,
            quadrant: (center, center + outward * radius),
        }
    }

    /// Whether a circle contact belongs to this corner's quarter
    #[inline]
    pub fn accepts(&self, point: DVec2) -> bool {
        point_in_box(point, self.quadrant.0, self.quadrant.1)
    }
}

/// A rectangle outset by a radius, with rounded corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stadium {
    /// Left, right, top, bottom (y grows downward)
    pub sides: [Segment; 4],
    /// Left-top, right-top, left-bottom, right-bottom
    pub corners: [Corner; 4],
}

impl Stadium {
    /// Stadium of a rectangle (`top_left`, `size`) for a ball of `radius`
    pub fn around(top_left: DVec2, size: DVec2, radius: f64) -> Self {
        let (x, y) = (top_left.x, top_left.y);
        let (w, h) = (size.x, size.y);
        let r = radius;

        let sides = [
            Segment::new(DVec2::new(x - r, y), DVec2::new(x - r, y + h)),
            Segment::new(DVec2::new(x + w + r, y), DVec2::new(x + w + r, y + h)),
            Segment::new(DVec2::new(x, y - r), DVec2::new(x + w, y - r)),
            Segment::new(DVec2::new(x, y + h + r), DVec2::new(x + w, y + h + r)),
        ];
        let corners = [
            Corner::new(DVec2::new(x, y), r, DVec2::new(-1.0, -1.0)),
            Corner::new(DVec2::new(x + w, y), r, DVec2::new(1.0, -1.0)),
            Corner::new(DVec2::new(x, y + h), r, DVec2::new(-1.0, 1.0)),
            Corner::new(DVec2::new(x + w, y + h), r, DVec2::new(1.0, 1.0)),
        ];
        Self { sides, corners }
    }

    /// All contacts of a point swept along `sweep` with this stadium
    ///
    /// Sides are reported first, then corners in declaration order.
    pub fn collisions(&self, sweep: Segment) -> Result<Vec<Collision>, SimError> {
        let mut collisions = Vec::new();
        for side in &self.sides {
            collisions.extend(segment_vs_segment(sweep, *side)?);
        }
        for corner in &self.corners {
            collisions.extend(
                segment_vs_circle(sweep, corner.center, corner.radius)
                    .into_iter()
                    .filter(|c| corner.accepts(c.position)),
            );
        }
        Ok(collisions)
    }
}

/// Collisions of a ball of `ball_radius` moving by `movement` from `start`
/// into the rectangle at `top_left` with `size`
pub fn ball_rect_collision(
    ball_radius: f64,
    top_left: DVec2,
    size: DVec2,
    start: DVec2,
    movement: DVec2,
) -> Result<Vec<Collision>, SimError> {
    Stadium::around(top_left, size, ball_radius).collisions(Segment::from_move(start, movement))
}

/// Remaining move after `collision`, reflected about its normal
///
/// The collision must lie on the path from `start` along `movement`. The returned
/// vector applies from the collision position.
pub fn resolve_collision(start: DVec2, movement: DVec2, collision: &Collision) -> DVec2 {
    let to_contact = collision.position - start;
    mirror_vector(movement - to_contact, collision.normal)
}

/// Closest collision to `point` and its index; ties keep the earliest entry
pub fn closest_collision(point: DVec2, collisions: &[Collision]) -> Option<(usize, Collision)> {
    collisions
        .iter()
        .copied()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            distance(point, a.position).total_cmp(&distance(point, b.position))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_2;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new(DVec2::new(x1, y1), DVec2::new(x2, y2))
    }

    /// Angles away from the axes, in any quadrant
    fn oblique_angle() -> impl Strategy<Value = f64> {
        (0.05f64..1.52, 0u8..4).prop_map(|(a, quadrant)| a + quadrant as f64 * FRAC_PI_2)
    }

    #[test]
    fn test_segment_crossing_axis_aligned() {
        let hit = segment_vs_segment(seg(0.0, 5.0, 10.0, 5.0), seg(4.0, 0.0, 4.0, 10.0))
            .unwrap()
            .expect("segments cross");
        assert!((hit.position - DVec2::new(4.0, 5.0)).length() < 1e-12);
        // Normal is orthogonal to the target
        assert!(hit.normal.dot(DVec2::Y).abs() < 1e-9);
    }

    #[test]
    fn test_segment_lines_cross_outside_extent() {
        // Lines meet at (4, 5) but the target stops at y = 3
        let hit = segment_vs_segment(seg(0.0, 5.0, 10.0, 5.0), seg(4.0, 0.0, 4.0, 3.0)).unwrap();
        assert!(hit.is_none());
    }

    #[test]
    fn test_segment_collinear_overlap_returns_nearest_shared_endpoint() {
        let hit = segment_vs_segment(seg(0.0, 0.0, 4.0, 0.0), seg(2.0, 0.0, 6.0, 0.0))
            .unwrap()
            .expect("overlapping segments");
        assert_eq!(hit.position, DVec2::new(2.0, 0.0));
    }

    #[test]
    fn test_segment_collinear_disjoint() {
        let hit = segment_vs_segment(seg(0.0, 0.0, 1.0, 1.0), seg(2.0, 2.0, 3.0, 3.0)).unwrap();
        assert!(hit.is_none());
    }

    #[test]
    fn test_segment_parallel_vertical() {
        let hit = segment_vs_segment(seg(15.0, 100.0, 15.0, 50.0), seg(20.0, 0.0, 20.0, 60.0))
            .unwrap();
        assert!(hit.is_none());
    }

    #[test]
    fn test_circle_tangent_single_point() {
        let center = DVec2::new(3.0, 4.0);
        let hits = segment_vs_circle(seg(0.0, 6.0, 6.0, 6.0), center, 2.0);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].position - DVec2::new(3.0, 6.0)).length() < 1e-12);

        // Vertical tangent
        let hits = segment_vs_circle(seg(5.0, 0.0, 5.0, 10.0), center, 2.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].position, DVec2::new(5.0, 4.0));
    }

    #[test]
    fn test_circle_miss() {
        let center = DVec2::new(3.0, 4.0);
        assert!(segment_vs_circle(seg(0.0, 10.0, 6.0, 10.0), center, 2.0).is_empty());
        assert!(segment_vs_circle(seg(8.0, 0.0, 8.0, 10.0), center, 2.0).is_empty());
        // Line crosses the circle but the segment stops short
        assert!(segment_vs_circle(seg(-10.0, 4.0, -5.0, 4.0), center, 2.0).is_empty());
    }

    #[test]
    fn test_circle_vertical_through_center() {
        let hits = segment_vs_circle(seg(0.0, -10.0, 0.0, 10.0), DVec2::ZERO, 5.0);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().any(|c| c.position == DVec2::new(0.0, 5.0)));
        assert!(hits.iter().any(|c| c.position == DVec2::new(0.0, -5.0)));
    }

    #[test]
    fn test_stadium_side_hit() {
        let hits = ball_rect_collision(
            10.0,
            DVec2::new(100.0, 100.0),
            DVec2::new(10.0, 60.0),
            DVec2::new(105.0, 50.0),
            DVec2::new(0.0, 100.0),
        )
        .unwrap();
        assert_eq!(hits.len(), 1);
        assert!((hits[0].position - DVec2::new(105.0, 90.0)).length() < 1e-9);
        assert!(hits[0].normal.x.abs() < 1e-9);
    }

    #[test]
    fn test_stadium_corner_hit() {
        let hits = ball_rect_collision(
            10.0,
            DVec2::new(100.0, 100.0),
            DVec2::new(10.0, 60.0),
            DVec2::new(80.0, 80.0),
            DVec2::new(20.0, 20.0),
        )
        .unwrap();
        assert_eq!(hits.len(), 1);
        let corner = DVec2::new(100.0, 100.0);
        assert!((hits[0].position.distance(corner) - 10.0).abs() < 1e-9);
        // Normal points out of the corner, up and to the left
        assert!(hits[0].normal.x < 0.0 && hits[0].normal.y < 0.0);
    }

    #[test]
    fn test_stadium_corner_wrong_quadrant_rejected() {
        // Passes through the top-left corner circle only inside the rectangle's
        // own quadrant; the top side takes the hit instead
        let stadium = Stadium::around(DVec2::new(100.0, 100.0), DVec2::new(10.0, 60.0), 10.0);
        let hits = stadium.collisions(seg(103.0, 80.0, 103.0, 95.0)).unwrap();
        assert_eq!(hits.len(), 1);
        assert!((hits[0].position - DVec2::new(103.0, 90.0)).length() < 1e-9);
    }

    #[test]
    fn test_stadium_miss() {
        let hits = ball_rect_collision(
            10.0,
            DVec2::new(100.0, 100.0),
            DVec2::new(10.0, 60.0),
            DVec2::new(50.0, 50.0),
            DVec2::new(0.0, 200.0),
        )
        .unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_resolve_normal_incidence() {
        let start = DVec2::ZERO;
        let wall = seg(5.0, -10.0, 5.0, 10.0);

        // Overshoot: the remaining part of the move comes straight back
        let movement = DVec2::new(8.0, 0.0);
        let hit = segment_vs_segment(Segment::from_move(start, movement), wall)
            .unwrap()
            .expect("wall hit");
        let remaining = resolve_collision(start, movement, &hit);
        assert!((remaining.x - -3.0).abs() < 1e-9);
        assert!(remaining.y.abs() < 1e-9);

        // Exactly reaching the wall leaves nothing, velocity still flips
        let movement = DVec2::new(5.0, 0.0);
        let hit = segment_vs_segment(Segment::from_move(start, movement), wall)
            .unwrap()
            .expect("wall hit");
        assert!(resolve_collision(start, movement, &hit).length() < 1e-9);
        let velocity = mirror_vector(movement, hit.normal);
        assert!((velocity.x - -5.0).abs() < 1e-9);
        assert!(velocity.y.abs() < 1e-9);
    }

    #[test]
    fn test_closest_collision_ties_keep_first() {
        let at = |x: f64, y: f64| Collision {
            position: DVec2::new(x, y),
            normal: DVec2::X,
        };
        let hits = [at(5.0, 0.0), at(0.0, 3.0), at(-3.0, 0.0)];
        let (index, found) = closest_collision(DVec2::ZERO, &hits).unwrap();
        assert_eq!(index, 1);
        assert_eq!(found.position, DVec2::new(0.0, 3.0));
        assert!(closest_collision(DVec2::ZERO, &[]).is_none());
    }

    proptest! {
        #[test]
        fn perpendicular_segments_meet_at_crossing(
            px in -500.0f64..500.0,
            py in -500.0f64..500.0,
            angle in oblique_angle(),
            before in 1.0f64..100.0,
            after in 1.0f64..100.0,
            below in 1.0f64..100.0,
            above in 1.0f64..100.0,
        ) {
            let crossing = DVec2::new(px, py);
            let dir = DVec2::from_angle(angle);
            let across = dir.perp();
            let sweep = Segment::new(crossing - dir * before, crossing + dir * after);
            let target = Segment::new(crossing - across * below, crossing + across * above);

            let hit = segment_vs_segment(sweep, target).unwrap();
            prop_assert!(hit.is_some());
            prop_assert!((hit.unwrap().position - crossing).length() < 1e-6);
        }

        #[test]
        fn parallel_offset_segments_never_collide(
            px in -500.0f64..500.0,
            py in -500.0f64..500.0,
            angle in oblique_angle(),
            offset in 1.0f64..100.0,
            shift in -50.0f64..50.0,
            length in 1.0f64..100.0,
            target_length in 1.0f64..100.0,
        ) {
            let origin = DVec2::new(px, py);
            let dir = DVec2::from_angle(angle);
            let target_start = origin + dir.perp() * offset + dir * shift;
            let sweep = Segment::new(origin, origin + dir * length);
            let target = Segment::new(target_start, target_start + dir * target_length);

            prop_assert!(segment_vs_segment(sweep, target).unwrap().is_none());
        }

        #[test]
        fn sweep_through_center_hits_circle_twice(
            cx in -200.0f64..200.0,
            cy in -200.0f64..200.0,
            radius in 1.0f64..100.0,
            angle in oblique_angle(),
        ) {
            let center = DVec2::new(cx, cy);
            let dir = DVec2::from_angle(angle);
            let sweep = Segment::new(center - dir * 2.0 * radius, center + dir * 2.0 * radius);

            let hits = segment_vs_circle(sweep, center, radius);
            prop_assert_eq!(hits.len(), 2);
            for hit in &hits {
                prop_assert!((hit.position.distance(center) - radius).abs() < 1e-6);
                let offset = hit.position - center;
                prop_assert!(hit.normal.perp_dot(offset).abs() < 1e-6);
                prop_assert!(hit.normal.dot(offset) > 0.0);
            }
        }
    }
}
