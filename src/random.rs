//! Sources of randomness.
//!
//! Two sources exist: [`Random::Seeded`] draws from a `fastrand` generator
//! seeded once per run (the default, heuristic-friendly path used by
//! `quickcheck`/`smallcheck`), and [`Random::Fixed`] replays a byte buffer
//! supplied by an external coverage-guided fuzzer (`fuzzcheck`). Both are
//! driven through the same [`Stream`] trait so that generator code never has
//! to know which source backs a particular run.

/// Abstract stream of bytes with uniform integer/float primitives built on
/// top of it. A [`Random`] is the concrete union of the two sources this
/// crate supports; [`Stream`] is the narrow interface generators actually
/// consume.
pub trait Stream {
    /// Draws a single byte from the stream. A byte-buffer-backed stream that
    /// has been exhausted returns zeroes forever, mirroring the behaviour of
    /// the original source's `RandomSourceFromBytes`.
    fn next_byte(&mut self) -> u8;

    fn next_bytes(&mut self, buffer: &mut [u8]) {
        for slot in buffer {
            *slot = self.next_byte();
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut buffer = [0u8; 8];
        self.next_bytes(&mut buffer);
        u64::from_be_bytes(buffer)
    }

    /// Uniform float in `[0.0, 1.0)`. There are exactly `1 << 53` `f64`s in
    /// that range; this takes the low 53 bits of a random `u64`.
    fn next_f64(&mut self) -> f64 {
        ((self.next_u64() << 11) >> 11) as f64 / (1u64 << 53) as f64
    }

    fn next_bool(&mut self) -> bool {
        self.next_byte() & 1 == 1
    }

    /// Uniform `u64` in `[0, bound)`. `bound == 0` always returns `0`.
    fn uniform_u64(&mut self, bound: u64) -> u64 {
        if bound == 0 { 0 } else { self.next_u64() % bound }
    }

    /// Uniform `i64` in `[low, high]` (inclusive on both ends).
    fn uniform_i64(&mut self, low: i64, high: i64) -> i64 {
        if low >= high {
            return low;
        }
        let span = (high as i128 - low as i128) as u128 + 1;
        let offset = self.uniform_u64(span as u64) as i128;
        (low as i128 + offset) as i64
    }

    /// True with probability `numerator / denominator`.
    fn coin(&mut self, numerator: u32, denominator: u32) -> bool {
        debug_assert!(numerator <= denominator);
        self.uniform_u64(denominator as u64) < numerator as u64
    }
}

/// Source of randomness for one run: either a seeded PRNG or a replayed byte
/// buffer from an external fuzzer.
#[derive(Debug, Clone)]
pub enum Random {
    Seeded(fastrand::Rng),
    Fixed(FixedStream),
}

impl Random {
    pub fn seeded(seed: u64) -> Self {
        Random::Seeded(fastrand::Rng::with_seed(seed))
    }

    pub fn fixed(buffer: Vec<u8>) -> Self {
        Random::Fixed(FixedStream::new(buffer))
    }

    /// Standard-normal-ish sample via the Box-Muller transform, used by the
    /// integer heuristic (§4.2 of the generator contract). Not
    /// cryptographically anything; it only needs to bias sampling towards
    /// small magnitudes.
    pub fn next_normal(&mut self) -> f64 {
        let u1 = self.next_f64().max(f64::MIN_POSITIVE);
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

impl Stream for Random {
    fn next_byte(&mut self) -> u8 {
        match self {
            Random::Seeded(rng) => rng.u8(..),
            Random::Fixed(stream) => stream.next_byte(),
        }
    }

    fn next_f64(&mut self) -> f64 {
        match self {
            Random::Seeded(rng) => rng.f64(),
            Random::Fixed(stream) => stream.next_f64(),
        }
    }

    fn next_bool(&mut self) -> bool {
        match self {
            Random::Seeded(rng) => rng.bool(),
            Random::Fixed(stream) => stream.next_bool(),
        }
    }

    fn uniform_u64(&mut self, bound: u64) -> u64 {
        match self {
            Random::Seeded(rng) => {
                if bound == 0 {
                    0
                } else {
                    rng.u64(0..bound)
                }
            }
            Random::Fixed(stream) => stream.uniform_u64(bound),
        }
    }
}

/// Replays a fixed byte buffer; once exhausted, returns zeroes rather than
/// erroring, matching the original `RandomSourceFromBytes` semantics so a
/// fuzzer-supplied buffer that is too short degrades to "everything default"
/// instead of panicking.
#[derive(Debug, Clone)]
pub struct FixedStream {
    buffer: Vec<u8>,
    position: usize,
}

impl FixedStream {
    pub fn new(buffer: Vec<u8>) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }
}

impl Stream for FixedStream {
    fn next_byte(&mut self) -> u8 {
        let byte = self.buffer.get(self.position).copied().unwrap_or(0);
        self.position = self.position.saturating_add(1);
        byte
    }
}

/// Generates a fresh seed, used when [`crate::config::Config::seed`] is left
/// unset.
pub fn seed() -> u64 {
    fastrand::u64(..)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_stream_zero_pads_past_end() {
        let mut stream = FixedStream::new(vec![1, 2, 3]);
        assert_eq!(stream.next_byte(), 1);
        assert_eq!(stream.next_byte(), 2);
        assert_eq!(stream.next_byte(), 3);
        assert_eq!(stream.next_byte(), 0);
        assert_eq!(stream.next_byte(), 0);
    }

    #[test]
    fn uniform_u64_is_in_bound() {
        let mut stream = FixedStream::new((0..64u8).collect());
        for _ in 0..20 {
            assert!(stream.uniform_u64(7) < 7);
        }
    }
}
