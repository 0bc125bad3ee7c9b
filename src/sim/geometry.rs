//! Collision geometry under parabolic flight
//!
//! Between events the particle follows `x(t) = x + vx t`,
//! `y(t) = y + vy t - t^2/2` (gravity normalized to 1). Candidate event
//! times come from intersecting that parabola with each obstacle class:
//! a quartic for pegs, a linear crossing for walls, a quadratic for the
//! bottom exit.

use glam::DVec2;

use crate::roots::Quartic;

/// Position after flying for `t` from `pos` with initial velocity `vel`.
#[inline]
pub fn position_at(pos: DVec2, vel: DVec2, t: f64) -> DVec2 {
    DVec2::new(pos.x + vel.x * t, pos.y + vel.y * t - 0.5 * t * t)
}

/// Velocity after flying for `t` with initial velocity `vel`.
#[inline]
pub fn velocity_at(vel: DVec2, t: f64) -> DVec2 {
    DVec2::new(vel.x, vel.y - t)
}

/// The quartic whose positive real roots are the times at which the flight
/// path is exactly `radius` away from the peg center:
///
/// `1/4 t^4 - vy t^3 + (vx^2 + vy^2 - dy) t^2 + 2 (vx dx + vy dy) t
///  + (dx^2 + dy^2 - R^2) = 0`
///
/// with `(dx, dy) = pos - peg`. The leading `1/4` comes from the squared
/// gravity term, so the quartic is never degenerate.
pub fn peg_quartic(pos: DVec2, vel: DVec2, radius: f64, peg: DVec2) -> Quartic {
    let d = pos - peg;
    Quartic::new([
        d.length_squared() - radius * radius,
        2.0 * vel.dot(d),
        vel.length_squared() - d.y,
        -vel.y,
        0.25,
    ])
}

/// Time to reach the vertical line `wall_x`, or `None` when the particle has
/// no horizontal motion. The caller filters for strictly positive times.
pub fn wall_cross_time(pos: DVec2, vel: DVec2, wall_x: f64) -> Option<f64> {
    if vel.x == 0.0 {
        return None;
    }
    Some((wall_x - pos.x) / vel.x)
}

/// Earliest strictly positive time at which the y-coordinate returns to
/// zero, solving `y + vy t - t^2/2 = 0`. `None` when the trajectory never
/// crosses from above.
pub fn exit_time(pos: DVec2, vel: DVec2) -> Option<f64> {
    let a = -0.5;
    let b = vel.y;
    let c = pos.y;
    let disc = b * b - 4.0 * a * c;
    if disc <= 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let t0 = (-b + sq) / (2.0 * a);
    let t1 = (-b - sq) / (2.0 * a);
    match (t0 > 0.0, t1 > 0.0) {
        (true, true) => Some(t0.min(t1)),
        (true, false) => Some(t0),
        (false, true) => Some(t1),
        (false, false) => None,
    }
}
