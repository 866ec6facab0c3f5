//! Random source helpers.
//!
//! Every run owns exactly one generator, created here from an explicit
//! seed so that searches are reproducible.

use crate::error::{Error, Result};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Creates the generator used by a single run.
pub fn create_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Draws `amount` distinct indices from `0..len`, in random order.
///
/// Returns [`Error::Configuration`] when `amount > len`; the draw is never
/// silently shortened.
pub fn unique_indices<R: Rng + ?Sized>(len: usize, amount: usize, rng: &mut R) -> Result<Vec<usize>> {
    if amount > len {
        return Err(Error::Configuration(format!(
            "cannot draw {amount} distinct indices from a pool of {len}"
        )));
    }
    Ok(rand::seq::index::sample(rng, len, amount).into_vec())
}
