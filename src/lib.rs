//! Plinko - event-driven trajectory simulation over a peg lattice
//!
//! A point particle falls under unit gravity through a field of circular
//! pegs, reflecting off pegs and side walls (with damping) until it leaves
//! the bottom of the domain or runs out of bounces. Instead of stepping time
//! on a fixed grid, the simulation jumps from event to event: the flight
//! path between events is an exact parabola, and the time of the next peg
//! collision is the smallest positive real root of a quartic.
//!
//! Core modules:
//! - `roots`: quartic root extraction (Bairstow, Durand-Kerner, Ferrari)
//! - `sim`: collision geometry, event scheduling, bounce response, and the
//!   bounded simulation loop with its sampling variants

pub mod roots;
pub mod sim;

pub use roots::{Quartic, RootSet, Solver};
pub use sim::{
    Board, BoardConfig, ChannelGrid, DensityGrid, Event, EventKind, Outcome, Particle, PegMask,
    PlinkoRng, PointSink, SampleBuffer, SampleInterval, Termination,
};

/// Simulation-wide constants
pub mod consts {
    /// Bounce budget guarding against numerically trapped trajectories
    pub const MAX_BOUNCES: u64 = 1 << 26;

    /// Micro-step taken after each bounce to move the particle just past the
    /// collision surface before the next scheduling query
    pub const EPS: f64 = 1e-10;

    /// Squared-velocity floor below which a trajectory is absorbed
    pub const SPEED_FLOOR: f64 = 1e-10;

    /// Sub-samples per inter-event flight in adaptive sampling mode
    pub const TSAMPLES: u32 = 25;
}
