//! Seeded pseudo-random number generator
//!
//! Randomized strategies derive a fresh generator from
//! (seed, slot, round) every time they choose, so their decisions stay a
//! pure function of the history length.

/// Seeded xorshift64* generator
///
/// Deterministic: same seed + stream = same sequence
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a new RNG from a seed and a stream index (the player slot)
    pub fn new(seed: u64, stream: u32) -> Self {
        let mut state = seed ^ 0x6a09e667f3bcc908;
        state ^= (stream as u64).wrapping_mul(0x517cc1b727220a95);
        // xorshift never leaves the all-zero state
        if state == 0 {
            state = 0x9e3779b97f4a7c15;
        }

        let mut rng = Self { state };
        for _ in 0..8 {
            rng.next_u64();
        }
        rng
    }

    /// Create RNG for a specific round
    pub fn for_round(&self, round: u32) -> Self {
        let mut state = self.state ^ (round as u64).wrapping_mul(0x9e3779b97f4a7c15);
        if state == 0 {
            state = 0x9e3779b97f4a7c15;
        }
        let mut rng = Self { state };
        rng.next_u64();
        rng
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545f4914f6cdd1d)
    }

    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Generate a value 0-99 (for percentage checks)
    pub fn next_percent(&mut self) -> u8 {
        (self.next_u32() % 100) as u8
    }
}
