//! Physical response to a scheduled event
//!
//! Pegs reflect the velocity about the surface normal; walls invert the
//! horizontal component. Either way the particle is then nudged one
//! micro-step past the surface (so the same contact is not rescheduled) and
//! damped exactly once.

use glam::DVec2;

use crate::consts::EPS;

use super::event::{Event, EventKind};
use super::geometry;
use super::state::{Board, Particle};

/// Outward unit normal from a peg center to a surface point.
#[inline]
pub fn surface_normal(center: DVec2, point: DVec2) -> DVec2 {
    (point - center).normalize()
}

/// Reflect `v` about the unit normal `n`: `v' = v - 2 (v . n) n`.
#[inline]
pub fn reflect(v: DVec2, n: DVec2) -> DVec2 {
    v - 2.0 * v.dot(n) * n
}

/// Pull a post-collision position back onto the peg surface, cancelling the
/// small numerical penetration or overshoot accumulated by the root solver.
#[inline]
pub fn constrain_to_surface(center: DVec2, radius: f64, point: DVec2) -> DVec2 {
    center + surface_normal(center, point) * radius
}

/// Apply a non-terminal event's bounce to a particle that has already been
/// advanced to the event time: reflect, constraint-correct, micro-step past
/// the surface, damp. `Exit` is terminal and leaves the velocity untouched;
/// the driver never routes it here.
pub fn apply_bounce(board: &Board, particle: &mut Particle, event: &Event) {
    match event.kind {
        EventKind::Peg(i) => {
            let peg = board.pegs()[i];
            let normal = surface_normal(peg, particle.pos);
            particle.vel = reflect(particle.vel, normal);
            particle.pos = constrain_to_surface(peg, board.radius, particle.pos);
        }
        EventKind::WallLeft | EventKind::WallRight => {
            particle.vel.x = -particle.vel.x;
        }
        EventKind::Exit => {}
    }

    particle.pos = geometry::position_at(particle.pos, particle.vel, EPS);
    particle.vel = geometry::velocity_at(particle.vel, EPS);
    particle.vel *= board.damp;
}
