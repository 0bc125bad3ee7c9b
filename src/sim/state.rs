//! Board and particle state
//!
//! A [`Board`] is immutable for the duration of a run and may be shared
//! read-only across threads; each concurrent simulation owns its own
//! [`Particle`] and sample sink.

use std::f64::consts::TAU;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_BOUNCES;
use crate::roots::Solver;

/// Physical constants for a run, serializable alongside outputs so a result
/// file always carries the configuration that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Peg radius, shared by every peg on the board
    pub radius: f64,
    /// Velocity scale applied once per bounce, in (0, 1]
    pub damp: f64,
    /// Right wall x-coordinate; the left wall sits at x = 0
    pub wall: f64,
    /// Advisory domain top; not consulted by the event logic
    pub top: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        // the classic board: pegs 3/4 of the unit lattice spacing wide
        Self {
            radius: 0.375,
            damp: 0.9,
            wall: 7.0,
            top: 10.0,
        }
    }
}

/// Optional angular cutouts that let the particle pass through a peg
/// instead of reflecting. An extension point, off by default.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PegMask {
    #[default]
    None,
    /// `n` evenly spaced holes of angular width `gap`, the first centered at
    /// angle `offset` from the positive x-axis.
    Holes { n: u32, gap: f64, offset: f64 },
}

impl PegMask {
    /// Whether an impact at `point` on the surface of the peg centered at
    /// `center` reflects, or falls through a hole.
    pub fn collision_allowed(&self, center: DVec2, point: DVec2) -> bool {
        match *self {
            PegMask::None => true,
            PegMask::Holes { n, gap, offset } => {
                if n == 0 {
                    return true;
                }
                let d = point - center;
                let theta = d.y.atan2(d.x) - offset;
                let period = TAU / f64::from(n);
                let frac = theta.rem_euclid(period);
                // each hole straddles a spoke angle
                frac > gap / 2.0 && frac < period - gap / 2.0
            }
        }
    }
}

/// The immutable world a particle falls through: peg lattice, walls, and
/// the physical/numerical parameters of the run.
#[derive(Debug, Clone)]
pub struct Board {
    pegs: Vec<DVec2>,
    /// Peg radius R > 0
    pub radius: f64,
    /// Damping factor in (0, 1], applied exactly once per bounce
    pub damp: f64,
    pub wall_left: f64,
    pub wall_right: f64,
    /// Advisory only; kept for config round-trips
    pub top: f64,
    pub solver: Solver,
    pub mask: PegMask,
    /// Bounce budget; reaching it terminates the run as numerically trapped
    pub max_bounces: u64,
}

impl Board {
    pub fn new(pegs: Vec<DVec2>, config: &BoardConfig) -> Self {
        Self {
            pegs,
            radius: config.radius,
            damp: config.damp,
            wall_left: 0.0,
            wall_right: config.wall,
            top: config.top,
            solver: Solver::default(),
            mask: PegMask::default(),
            max_bounces: MAX_BOUNCES,
        }
    }

    pub fn with_solver(mut self, solver: Solver) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_mask(mut self, mask: PegMask) -> Self {
        self.mask = mask;
        self
    }

    pub fn with_max_bounces(mut self, max_bounces: u64) -> Self {
        self.max_bounces = max_bounces;
        self
    }

    pub fn pegs(&self) -> &[DVec2] {
        &self.pegs
    }
}

/// Mutable particle state, owned exclusively by one running simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: DVec2,
    pub vel: DVec2,
}

impl Particle {
    pub fn new(pos: DVec2, vel: DVec2) -> Self {
        Self { pos, vel }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_none_always_allows() {
        let mask = PegMask::None;
        assert!(mask.collision_allowed(DVec2::ZERO, DVec2::new(0.375, 0.0)));
    }

    #[test]
    fn mask_holes_block_spoke_angles() {
        let mask = PegMask::Holes {
            n: 4,
            gap: 0.2,
            offset: 0.0,
        };
        let peg = DVec2::ZERO;
        // dead on a spoke (angle 0): inside the hole
        assert!(!mask.collision_allowed(peg, DVec2::new(0.375, 0.0)));
        // halfway between spokes (angle 45 degrees): solid peg
        let p = DVec2::new(0.265, 0.265);
        assert!(mask.collision_allowed(peg, p));
        // just inside the hole edge at angle 0
        let theta = 0.09f64;
        let p = 0.375 * DVec2::new(theta.cos(), theta.sin());
        assert!(!mask.collision_allowed(peg, p));
    }

    #[test]
    fn mask_offset_rotates_holes() {
        let quarter = TAU / 4.0;
        let mask = PegMask::Holes {
            n: 2,
            gap: 0.2,
            offset: quarter,
        };
        let peg = DVec2::ZERO;
        // holes now sit on the y-axis
        assert!(!mask.collision_allowed(peg, DVec2::new(0.0, 0.375)));
        assert!(mask.collision_allowed(peg, DVec2::new(0.375, 0.0)));
    }

    #[test]
    fn config_defaults_are_physical() {
        let config = BoardConfig::default();
        assert!(config.radius > 0.0);
        assert!(config.damp > 0.0 && config.damp <= 1.0);
        assert!(config.wall > 0.0);
    }
}
