//! Random integers in a half-open range.

use crate::error::{Result, ToolError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random integer in `min..max` from the thread-local generator.
///
/// `min == max` returns `min`; `min > max` is an error.
pub fn random_number(min: i32, max: i32) -> Result<i32> {
    draw(&mut rand::rng(), min, max)
}

/// Reproducible generator with the same contract as [`random_number`].
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Next integer in `min..max`.
    pub fn next_in(&mut self, min: i32, max: i32) -> Result<i32> {
        draw(&mut self.rng, min, max)
    }
}

fn draw<R: Rng + ?Sized>(rng: &mut R, min: i32, max: i32) -> Result<i32> {
    match min.cmp(&max) {
        std::cmp::Ordering::Greater => Err(ToolError::InvalidRange {
            min: i64::from(min),
            max: i64::from(max),
        }),
        std::cmp::Ordering::Equal => Ok(min),
        std::cmp::Ordering::Less => Ok(rng.random_range(min..max)),
    }
}
