//! The bounded simulation loop
//!
//! Repeatedly schedules the next event and applies its response until the
//! particle exits, decays, is absorbed, or exhausts the bounce budget. Two
//! variants: [`run`] produces only the terminal summary, [`run_sampled`]
//! additionally streams trajectory points into a caller-owned sink.

use log::warn;

use crate::consts::{SPEED_FLOOR, TSAMPLES};

use super::event::{EventKind, next_event};
use super::geometry;
use super::response;
use super::sink::PointSink;
use super::state::{Board, Particle};

/// Why a run stopped. Every terminal condition is a value, never a panic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Termination {
    /// Clean exit through the bottom of the domain at this x-coordinate
    Exited { x: f64 },
    /// No candidate event remained; the trajectory decays in place
    Decayed,
    /// The particle dipped below the floor mid-bounce or slowed past the
    /// speed floor
    Absorbed,
    /// Bounce budget exhausted; treat the trajectory as numerically trapped
    BounceLimit,
    /// The point sink refused a sample before the trajectory finished
    SinkFull,
}

/// Summary of one trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    /// Reflective collisions (pegs and walls) survived
    pub bounces: u64,
    /// Total parabolic flight time across all events
    pub time: f64,
    pub termination: Termination,
}

/// Spacing of emitted samples in [`run_sampled`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleInterval {
    /// Fixed time between samples
    Fixed(f64),
    /// Each inter-event flight divided into [`TSAMPLES`] sub-samples
    Adaptive,
}

impl SampleInterval {
    fn step(&self, time_to_event: f64) -> f64 {
        match *self {
            SampleInterval::Fixed(dt) => dt,
            SampleInterval::Adaptive => time_to_event / f64::from(TSAMPLES),
        }
    }
}

fn advance(particle: &mut Particle, t: f64) {
    particle.pos = geometry::position_at(particle.pos, particle.vel, t);
    particle.vel = geometry::velocity_at(particle.vel, t);
}

/// Run a particle to termination, tracking bounce count and elapsed time.
pub fn run(board: &Board, particle: &mut Particle) -> Outcome {
    let mut bounces = 0;
    let mut elapsed = 0.0;

    let termination = loop {
        if bounces >= board.max_bounces {
            warn!("bounce budget ({}) exhausted", board.max_bounces);
            break Termination::BounceLimit;
        }
        let Some(event) = next_event(board, particle) else {
            break Termination::Decayed;
        };
        elapsed += event.time;

        if event.kind == EventKind::Exit {
            particle.pos = geometry::position_at(particle.pos, particle.vel, event.time);
            break Termination::Exited { x: particle.pos.x };
        }

        advance(particle, event.time);
        if particle.pos.y < 0.0 || particle.vel.length_squared() < SPEED_FLOOR {
            break Termination::Absorbed;
        }

        response::apply_bounce(board, particle, &event);
        bounces += 1;
    };

    Outcome {
        bounces,
        time: elapsed,
        termination,
    }
}

/// Run a particle to termination while streaming trajectory samples.
///
/// Sampling policy: the starting position is emitted once, then between
/// events points are emitted at `t_last + k * interval` for times strictly
/// less than the next event, and the exact event point is always emitted.
/// A sink refusing a point terminates the run with [`Termination::SinkFull`].
pub fn run_sampled(
    board: &Board,
    particle: &mut Particle,
    interval: SampleInterval,
    sink: &mut dyn PointSink,
) -> Outcome {
    let mut bounces = 0;
    let mut elapsed = 0.0;
    let mut last_save = 0.0;

    if !sink.accept(particle.pos) {
        return Outcome {
            bounces,
            time: elapsed,
            termination: Termination::SinkFull,
        };
    }

    let termination = loop {
        if bounces >= board.max_bounces {
            warn!("bounce budget ({}) exhausted", board.max_bounces);
            break Termination::BounceLimit;
        }
        let Some(event) = next_event(board, particle) else {
            break Termination::Decayed;
        };
        let event_abs = elapsed + event.time;

        // intermediate samples strictly before the event
        let step = interval.step(event.time);
        let mut refused = false;
        if step > 0.0 {
            let mut t = last_save + step;
            while t < event_abs {
                let p = geometry::position_at(particle.pos, particle.vel, t - elapsed);
                if !sink.accept(p) {
                    refused = true;
                    break;
                }
                last_save = t;
                t += step;
            }
        }
        if refused {
            break Termination::SinkFull;
        }

        elapsed = event_abs;
        if event.kind == EventKind::Exit {
            particle.pos = geometry::position_at(particle.pos, particle.vel, event.time);
            if !sink.accept(particle.pos) {
                break Termination::SinkFull;
            }
            break Termination::Exited { x: particle.pos.x };
        }

        advance(particle, event.time);
        if !sink.accept(particle.pos) {
            break Termination::SinkFull;
        }
        last_save = elapsed;

        if particle.pos.y < 0.0 || particle.vel.length_squared() < SPEED_FLOOR {
            break Termination::Absorbed;
        }

        response::apply_bounce(board, particle, &event);
        bounces += 1;
    };

    Outcome {
        bounces,
        time: elapsed,
        termination,
    }
}
