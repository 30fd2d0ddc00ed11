//! RNG oracle for dice and probability rolls.
//!
//! Every roll in a fight goes through an [`RngOracle`] owned by the caller, so
//! a fight is replayable given the same seed and the same player commands.
//!
//! # Determinism
//!
//! All implementations must be deterministic: given the same seed they must
//! produce the same sequence. Rolls are consumed in a fixed order per action
//! (dodge, parry, hit, critical, bleed) so that order is part of the contract.

/// RNG oracle for random number generation.
pub trait RngOracle: Send {
    /// Generate the next raw u32 value.
    fn next_u32(&mut self) -> u32;

    /// Uniform value in [min, max] inclusive.
    fn range(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        let span = (i64::from(max) - i64::from(min) + 1) as u64;
        let offset = u64::from(self.next_u32()) % span;
        (i64::from(min) + offset as i64) as i32
    }

    /// Roll a d100 (1-100 inclusive).
    ///
    /// Common for percentage-based mechanics like hit chance.
    fn roll_d100(&mut self) -> i32 {
        self.range(1, 100)
    }

    /// Roll a die with N sides (1-N inclusive).
    fn roll_die(&mut self, sides: i32) -> i32 {
        self.range(1, sides)
    }

    /// Uniform value in [0, 1).
    fn unit(&mut self) -> f64 {
        f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0)
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR variant: 32-bit output from 64-bit state.
///
/// # Properties
///
/// - **Deterministic**: Same seed always produces same output
/// - **Fast**: Single multiply + xorshift + rotate
/// - **Small state**: Only 64 bits
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Advance the PCG state by one step.
    ///
    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// PCG output function using XSH-RR (xorshift high, random rotate).
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&mut self) -> u32 {
        self.state = Self::pcg_step(self.state);
        Self::pcg_output(self.state)
    }
}

/// Replays a fixed script of unit values, cycling when exhausted.
///
/// Each value is a fraction in [0, 1). `unit` returns it directly and `range`
/// maps it onto the interval, so `0.0` is the minimum and `0.999` the maximum.
/// Use it to force exact branches in tests.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    script: Vec<f64>,
    cursor: usize,
}

impl ScriptedRng {
    pub fn new(script: impl Into<Vec<f64>>) -> Self {
        Self {
            script: script.into(),
            cursor: 0,
        }
    }

    /// Script that always yields the same value.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of values consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }

    fn next_fraction(&mut self) -> f64 {
        if self.script.is_empty() {
            return 0.0;
        }
        let value = self.script[self.cursor % self.script.len()];
        self.cursor += 1;
        value.clamp(0.0, 0.999_999)
    }
}

impl RngOracle for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_fraction() * (f64::from(u32::MAX) + 1.0)) as u32
    }

    fn range(&mut self, min: i32, max: i32) -> i32 {
        let fraction = self.next_fraction();
        if min >= max {
            return min;
        }
        let span = f64::from(max) - f64::from(min) + 1.0;
        min + (fraction * span).floor() as i32
    }

    fn unit(&mut self) -> f64 {
        self.next_fraction()
    }
}
