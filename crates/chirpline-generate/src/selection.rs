//! Species selection for a round.

use chirpline_spec::SpeciesPool;

use crate::rng::GameRng;

/// Draws `count` species from the pool.
///
/// A count of zero, or one at least the pool size, keeps the whole pool.
/// The result is sorted by code so that generation over it does not depend on
/// draw order. Pass the result's codes to [`SpeciesPool::retain`] to replay a
/// round with the same birds.
pub fn select_species(pool: &SpeciesPool, count: usize, rng: &mut GameRng) -> SpeciesPool {
    let total = pool.len();
    if count == 0 || count >= total {
        return pool.clone();
    }

    // Partial Fisher-Yates over indices.
    let mut indices: Vec<usize> = (0..total).collect();
    for i in 0..count {
        let j = i + rng.index(total - i);
        indices.swap(i, j);
    }

    let chosen: Vec<&str> = indices[..count]
        .iter()
        .map(|&i| pool.species()[i].code.as_str())
        .collect();
    pool.retain(&chosen)
}
