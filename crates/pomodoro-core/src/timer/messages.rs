//! Break-time messages and the random source used to pick them.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

/// Shown during a break, one picked uniformly per break.
pub const BREAK_MESSAGES: [&str; 6] = [
    "take a break!",
    "breathe air",
    "drink water",
    "keep going, you're doing great!",
    "touch grass",
    "go out",
];

/// Rare replacement for the regular break message.
pub const EASTER_EGG: &str = "i use arch btw";

/// One in this many breaks shows [`EASTER_EGG`].
pub const EASTER_EGG_ODDS: u32 = 1000;

/// Randomness needed by the controller.
pub trait RandomSource {
    /// Uniform index in `0..len`. `len` is never zero.
    fn index(&mut self, len: usize) -> usize;

    /// True with probability `1 / n`.
    fn one_in(&mut self, n: u32) -> bool;
}

/// Thread-local OS-seeded generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn index(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }

    fn one_in(&mut self, n: u32) -> bool {
        rand::thread_rng().gen_ratio(1, n)
    }
}

/// Deterministic generator for reproducible runs.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: Pcg64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn one_in(&mut self, n: u32) -> bool {
        self.rng.gen_ratio(1, n)
    }
}

/// Pick the message for a new break.
///
/// The regular draw always happens so the easter-egg roll stays independent
/// of it.
pub fn select_break_message<R: RandomSource + ?Sized>(rng: &mut R) -> &'static str {
    let regular = BREAK_MESSAGES[rng.index(BREAK_MESSAGES.len())];
    if rng.one_in(EASTER_EGG_ODDS) {
        EASTER_EGG
    } else {
        regular
    }
}
