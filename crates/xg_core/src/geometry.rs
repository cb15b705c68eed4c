//! # Geometry Primitives
//!
//! Plane geometry in stadium units. All functions are total: degenerate
//! inputs map to fixed conventions instead of errors.

use crate::models::Point;
use std::f64::consts::FRAC_PI_2;

/// Denominator guard for slopes and ratios.
pub const ZERO: f64 = 1e-10;

/// Euclidean (L2) distance between `(x1, y1)` and `(x2, y2)`.
pub fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt()
}

/// Angle between a straight shot from `(x, y)` to `(gx, gy)` and the goal line.
///
/// Direction is ignored, so the result lies in `[0, π/2]`: 0 is a shot along
/// the goal line, π/2 is perpendicular to it. A zero `dy` returns π/2;
/// trained models depend on that convention.
pub fn angle_from_goal(x: f64, y: f64, gx: f64, gy: f64) -> f64 {
    let dx = (x - gx).abs();
    let dy = (y - gy).abs();
    if dy > 0.0 {
        (dx / dy).atan()
    } else {
        FRAC_PI_2
    }
}

/// Slope of the line through two points. Vertical lines yield a very large
/// finite value.
pub fn slope(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    (y2 - y1) / (x2 - x1 + ZERO)
}

/// `y` at `target_x` on the line through `point` with the given slope.
pub fn point_on_line(point: &Point, slope: f64, target_x: f64) -> f64 {
    slope * (target_x - point.x) + point.y
}
