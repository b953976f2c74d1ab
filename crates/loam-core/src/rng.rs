//! Deterministic random number generation with explicit state.
//!
//! [`Pcg32`] is a PCG-XSH-RR generator (64-bit state, 32-bit output).
//! There is deliberately no global generator and no hidden seeding —
//! the owner constructs a `Pcg32` and threads it through calls, which
//! keeps simulation and placement code replayable.

/// PCG-XSH-RR 32-bit generator.
///
/// Small, fast, and statistically solid for game use (jitter, particle
/// placement, shuffles). Not cryptographically secure.
#[derive(Clone, Debug)]
pub struct Pcg32 {
    state: u64,
    inc: u64,
}

const PCG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;

impl Pcg32 {
    /// Create a generator from a seed and a stream selector.
    ///
    /// Distinct `stream` values produce independent sequences for the
    /// same seed.
    pub fn new(seed: u64, stream: u64) -> Self {
        let mut rng = Self {
            state: 0,
            inc: (stream << 1) | 1,
        };
        rng.next_u32();
        rng.state = rng.state.wrapping_add(seed);
        rng.next_u32();
        rng
    }

    /// Next 32 uniformly distributed bits.
    pub fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = old.wrapping_mul(PCG_MULTIPLIER).wrapping_add(self.inc);
        let xorshifted = (((old >> 18) ^ old) >> 27) as u32;
        let rot = (old >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Uniform value in `[0, bound)` via rejection sampling.
    ///
    /// Rejection avoids the modulo bias of a plain `next_u32() % bound`.
    ///
    /// # Panics
    ///
    /// Panics if `bound == 0`.
    pub fn bounded_u32(&mut self, bound: u32) -> u32 {
        assert!(bound > 0, "bound must be non-zero");
        // Smallest threshold such that [threshold, 2^32) is a whole
        // number of `bound`-sized buckets.
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let r = self.next_u32();
            if r >= threshold {
                return r % bound;
            }
        }
    }

    /// Uniform value in `[lo, hi)`.
    ///
    /// # Panics
    ///
    /// Panics if `lo >= hi`.
    pub fn range_i32(&mut self, lo: i32, hi: i32) -> i32 {
        assert!(lo < hi, "empty range [{lo}, {hi})");
        let span = (hi as i64 - lo as i64) as u32;
        lo.wrapping_add(self.bounded_u32(span) as i32)
    }

    /// Uniform value in `[0, 1)` with 24 bits of precision.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
    }
}
