//! Plinko CLI
//!
//! Drives the library the way the classic experiments did: a single sampled
//! trajectory, an ensemble of bounce counts over randomized drop columns, or
//! a density image accumulated over many trajectories (optionally split into
//! channels by bounce parity). Outputs are JSON files sharing a common
//! prefix, with the board configuration written alongside so results stay
//! self-describing.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use glam::DVec2;
use log::info;
use serde::Serialize;

use plinko::sim::{
    self, Board, BoardConfig, ChannelGrid, PlinkoRng, SampleBuffer, SampleInterval,
};
use plinko::{PointSink, Solver, Termination};

#[derive(Parser)]
#[command(name = "plinko", about = "Plinko board trajectory simulator")]
struct Cli {
    /// Output file prefix
    #[arg(short, long, default_value = "plinko")]
    out: PathBuf,

    /// Root-finding strategy: bairstow, durand-kerner, or ferrari
    #[arg(long, default_value = "bairstow")]
    solver: String,

    #[command(subcommand)]
    command: Command,
}

/// Board flags shared by every subcommand. Unset flags fall back to the
/// subcommand's preset, so each mode reproduces its classic setup out of
/// the box.
#[derive(Args)]
struct BoardArgs {
    /// Peg radius [default: 0.375]
    #[arg(long)]
    radius: Option<f64>,

    /// Velocity damping per bounce, in (0, 1]
    #[arg(long)]
    damp: Option<f64>,

    /// Right wall position (left wall is at x = 0)
    #[arg(long)]
    wall: Option<f64>,

    /// Drop height [default: 10]
    #[arg(long)]
    top: Option<f64>,

    /// Hex lattice rows
    #[arg(long)]
    rows: Option<u32>,

    /// Hex lattice columns
    #[arg(long)]
    cols: Option<u32>,
}

/// Per-subcommand board defaults, taken from the classic experiment setups.
struct BoardPreset {
    damp: f64,
    wall: f64,
    rows: u32,
    cols: u32,
}

const SINGLE_BOARD: BoardPreset = BoardPreset {
    damp: 0.99,
    wall: 7.0,
    rows: 4,
    cols: 8,
};

const BOUNCES_BOARD: BoardPreset = BoardPreset {
    damp: 1.0,
    wall: 7.0,
    rows: 4,
    cols: 8,
};

const DENSITY_BOARD: BoardPreset = BoardPreset {
    damp: 0.9,
    wall: 14.0,
    rows: 4,
    cols: 16,
};

impl BoardArgs {
    fn build(&self, solver: Solver, preset: &BoardPreset) -> Result<(Board, BoardConfig)> {
        let radius = self.radius.unwrap_or(0.375);
        let damp = self.damp.unwrap_or(preset.damp);
        if radius <= 0.0 {
            bail!("peg radius must be positive");
        }
        if !(0.0..=1.0).contains(&damp) || damp == 0.0 {
            bail!("damping factor must lie in (0, 1]");
        }
        let config = BoardConfig {
            radius,
            damp,
            wall: self.wall.unwrap_or(preset.wall),
            top: self.top.unwrap_or(10.0),
        };
        let pegs = sim::hex_grid(
            self.rows.unwrap_or(preset.rows),
            self.cols.unwrap_or(preset.cols),
            1 << 10,
        );
        Ok((Board::new(pegs, &config).with_solver(solver), config))
    }
}

#[derive(Subcommand)]
enum Command {
    /// Trace one trajectory and write its sample points
    Single {
        #[command(flatten)]
        board: BoardArgs,

        /// Drop x-coordinate
        #[arg(long, default_value_t = std::f64::consts::PI)]
        x: f64,

        /// Sampling interval (seconds of flight time)
        #[arg(long, default_value_t = 0.08)]
        interval: f64,

        /// Sample capacity
        #[arg(long, default_value_t = 1 << 20)]
        capacity: usize,
    },
    /// Drop many particles at random columns and record bounce counts
    Bounces {
        #[command(flatten)]
        board: BoardArgs,

        /// Number of trajectories
        #[arg(short, long, default_value_t = 1 << 16)]
        count: u64,

        /// RNG seed
        #[arg(long, default_value_t = 123123)]
        seed: u64,
    },
    /// Accumulate many trajectories into a density image
    Density {
        #[command(flatten)]
        board: BoardArgs,

        /// Number of trajectories
        #[arg(short, long, default_value_t = 1 << 10)]
        count: u64,

        /// RNG seed
        #[arg(long, default_value_t = 123123)]
        seed: u64,

        /// Grid resolution in pixels per world unit
        #[arg(long, default_value_t = 100.0)]
        ppi: f64,

        /// Sampling interval
        #[arg(long, default_value_t = 0.10)]
        interval: f64,

        /// Density channels; with 2, trajectories split by bounce parity
        /// (the two-tone boards)
        #[arg(long, default_value_t = 1)]
        channels: usize,
    },
}

/// The classic ensembles drop from a one-unit band centered on the board.
fn drop_column(rng: &mut PlinkoRng, wall: f64) -> f64 {
    wall / 2.0 - 0.5 + rng.uniform()
}

fn write_json<T: Serialize>(path: PathBuf, value: &T) -> Result<()> {
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer(BufWriter::new(file), value)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = prefix.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

#[derive(Serialize)]
struct TrajectoryOutput {
    bounces: u64,
    time: f64,
    samples: Vec<DVec2>,
}

#[derive(Serialize)]
struct BounceOutput {
    seed: u64,
    bounces: Vec<u64>,
    exits: Vec<Option<f64>>,
}

#[derive(Serialize)]
struct DensityOutput {
    width: usize,
    height: usize,
    channels: Vec<Vec<f64>>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let solver = Solver::from_str(&cli.solver)
        .with_context(|| format!("unknown solver {:?}", cli.solver))?;

    match cli.command {
        Command::Single {
            board,
            x,
            interval,
            capacity,
        } => {
            let (board, config) = board.build(solver, &SINGLE_BOARD)?;
            let mut particle = sim::Particle::new(DVec2::new(x, config.top), DVec2::new(0.0, 1e-4));
            let mut buffer = SampleBuffer::with_capacity(capacity);
            let outcome = sim::run_sampled(
                &board,
                &mut particle,
                SampleInterval::Fixed(interval),
                &mut buffer,
            );
            info!(
                "trajectory: {} bounces, {:.3}s flight, {:?}",
                outcome.bounces, outcome.time, outcome.termination
            );
            write_json(with_suffix(&cli.out, ".conf.json"), &config)?;
            write_json(with_suffix(&cli.out, ".pegs.json"), &board.pegs())?;
            write_json(
                with_suffix(&cli.out, ".track.json"),
                &TrajectoryOutput {
                    bounces: outcome.bounces,
                    time: outcome.time,
                    samples: buffer.points().to_vec(),
                },
            )?;
        }

        Command::Bounces { board, count, seed } => {
            let (board, config) = board.build(solver, &BOUNCES_BOARD)?;
            let mut rng = PlinkoRng::new(seed);
            let mut bounces = Vec::with_capacity(count as usize);
            let mut exits = Vec::with_capacity(count as usize);
            for i in 0..count {
                let x = drop_column(&mut rng, config.wall);
                let mut particle =
                    sim::Particle::new(DVec2::new(x, config.top), DVec2::new(0.0, 1e-4));
                let outcome = sim::run(&board, &mut particle);
                bounces.push(outcome.bounces);
                exits.push(match outcome.termination {
                    Termination::Exited { x } => Some(x),
                    _ => None,
                });
                if i % 10_000 == 0 {
                    info!("{i}/{count}");
                }
            }
            write_json(with_suffix(&cli.out, ".conf.json"), &config)?;
            write_json(with_suffix(&cli.out, ".pegs.json"), &board.pegs())?;
            write_json(
                with_suffix(&cli.out, ".track.json"),
                &BounceOutput {
                    seed,
                    bounces,
                    exits,
                },
            )?;
        }

        Command::Density {
            board,
            count,
            seed,
            ppi,
            interval,
            channels,
        } => {
            let (board, config) = board.build(solver, &DENSITY_BOARD)?;
            let mut rng = PlinkoRng::new(seed);
            let mut grid = ChannelGrid::new(
                channels,
                ppi,
                DVec2::ZERO,
                DVec2::new(config.wall, config.top),
            );
            // the channel (bounce parity) is only known once the run ends,
            // so each trajectory is buffered first and replayed into the grid
            let mut buffer = SampleBuffer::with_capacity(1 << 20);
            for i in 0..count {
                let x = drop_column(&mut rng, config.wall);
                let mut particle =
                    sim::Particle::new(DVec2::new(x, config.top), DVec2::new(0.0, 1e-4));
                buffer.clear();
                let outcome = sim::run_sampled(
                    &board,
                    &mut particle,
                    SampleInterval::Fixed(interval),
                    &mut buffer,
                );
                grid.select(outcome.bounces);
                grid.break_path();
                for &p in buffer.points() {
                    grid.accept(p);
                }
                if i % 100 == 0 {
                    info!("{i}/{count}");
                }
            }
            write_json(with_suffix(&cli.out, ".conf.json"), &config)?;
            write_json(with_suffix(&cli.out, ".pegs.json"), &board.pegs())?;
            write_json(
                with_suffix(&cli.out, ".density.json"),
                &DensityOutput {
                    width: grid.width(),
                    height: grid.height(),
                    channels: (0..grid.channels())
                        .map(|c| grid.channel(c).counts().to_vec())
                        .collect(),
                },
            )?;
        }
    }

    Ok(())
}
