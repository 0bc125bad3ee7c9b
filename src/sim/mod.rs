//! Deterministic plinko simulation
//!
//! All physics lives here. This module must stay pure and deterministic:
//! - event-driven stepping only, no wall-clock time
//! - explicit, caller-owned RNG
//! - stable iteration order over the peg list
//! - no rendering or I/O dependencies

pub mod driver;
pub mod event;
pub mod geometry;
pub mod lattice;
pub mod response;
pub mod rng;
pub mod sink;
pub mod state;

pub use driver::{Outcome, SampleInterval, Termination, run, run_sampled};
pub use event::{Event, EventKind, next_event};
pub use lattice::{hex_grid, square_neighbors};
pub use rng::PlinkoRng;
pub use sink::{ChannelGrid, DensityGrid, PointSink, SampleBuffer};
pub use state::{Board, BoardConfig, Particle, PegMask};
