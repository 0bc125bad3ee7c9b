//! Deterministic xorshift PRNG
//!
//! A 64-bit three-round xorshift with a multiplicative output mix, owned
//! explicitly by the caller so parallel runs get independent, reproducible
//! streams. Seeding mixes the seed into a fixed constant through one full
//! update round, so nearby seeds diverge immediately.

use rand::RngCore;

const INIT: u64 = 4101842887655102017;
const MULTIPLIER: u64 = 2685821657736338717;
/// Maps a mixed 64-bit word onto [0, 1).
const SCALE: f64 = 5.42101086242752217e-20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlinkoRng {
    state: u64,
}

impl PlinkoRng {
    pub fn new(seed: u64) -> Self {
        let mut rng = Self { state: INIT ^ seed };
        rng.state = rng.mix();
        rng
    }

    /// Re-seed in place, discarding the current stream.
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    fn mix(&mut self) -> u64 {
        self.state ^= self.state >> 21;
        self.state ^= self.state << 35;
        self.state ^= self.state >> 4;
        self.state.wrapping_mul(MULTIPLIER)
    }

    /// The next draw in [0, 1).
    pub fn uniform(&mut self) -> f64 {
        SCALE * self.mix() as f64
    }

    /// A draw in [lo, hi).
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.uniform()
    }
}

impl RngCore for PlinkoRng {
    fn next_u32(&mut self) -> u32 {
        (self.mix() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.mix()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.mix().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
