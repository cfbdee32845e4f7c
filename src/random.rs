//! Random source shared by the generators and the test loop.
//!
//! Every draw in a session flows through one `RandomSource`. The native draw
//! mirrors a C `random()` call: a uniform value in `[0, NATIVE_MAX]`. Wider
//! spans are covered by concatenating several native draws.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::{SystemTime, UNIX_EPOCH};

/// Largest value a single native draw can produce (`2^31 - 1`).
pub const NATIVE_MAX: u32 = i32::MAX as u32;

/// Number of distinct values a native draw covers.
const NATIVE_BASE: u128 = NATIVE_MAX as u128 + 1;

/// Widest span `below` accepts, enough for any pair of `i64` bounds.
const MAX_SPAN: u128 = 1 << 64;

/// Explicitly seeded pseudo-random state for one test session.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: ChaCha8Rng,
    seed: u64,
}

impl RandomSource {
    /// Seed a new source. `seed == 0` derives one from the system clock.
    pub fn init(seed: u64) -> Self {
        let seed = if seed == 0 { time_seed() } else { seed };
        log::info!("Random source seeded with {}", seed);
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The effective seed, useful to replay a session.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// One native draw, uniform over `[0, NATIVE_MAX]`.
    pub fn native(&mut self) -> u32 {
        self.rng.next_u32() >> 1
    }

    /// Uniform value in `[0, span)`.
    ///
    /// Spans wider than a single native draw are split into base `2^31`
    /// digits drawn one after the other; the biased tail is rejected so the
    /// result stays uniform.
    ///
    /// # Panics
    ///
    /// Panics unless `span` is in `1..=2^64`.
    pub fn below(&mut self, span: u128) -> u128 {
        assert!(
            span > 0 && span <= MAX_SPAN,
            "Span {} outside 1..=2^64",
            span
        );
        loop {
            let mut capacity: u128 = 1;
            let mut acc: u128 = 0;
            while capacity < span {
                acc = acc * NATIVE_BASE + self.native() as u128;
                capacity *= NATIVE_BASE;
            }

            let limit = capacity - capacity % span;
            if acc < limit {
                return acc % span;
            }
        }
    }

    /// Uniform `f64` in `[0, 1)` built from two native draws.
    pub fn unit(&mut self) -> f64 {
        let hi = self.native() as u64;
        let lo = self.native() as u64;
        // 62 random bits, truncated to the 53 an f64 mantissa holds
        let bits = ((hi << 31) | lo) >> 9;
        bits as f64 / (1u64 << 53) as f64
    }

    /// Fair coin flip.
    pub fn coin(&mut self) -> bool {
        self.unit() < 0.5
    }
}

/// Seeding entry point: `0` selects a time-derived seed.
pub fn init(seed: u64) -> RandomSource {
    RandomSource::init(seed)
}

fn time_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0);
    // 0 is reserved for "pick one for me"
    nanos.max(1)
}
