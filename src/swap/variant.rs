//! Random choice among numbered library variants.

use crate::naming::variant_name;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Build the run's PRNG. A seed makes variant choices reproducible.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Pick a variant index uniformly from `0..count`.
pub fn choose_variant<R: Rng + ?Sized>(rng: &mut R, count: u32) -> u32 {
    if count <= 1 {
        0
    } else {
        rng.gen_range(0..count)
    }
}

/// Pick one of `name`, `name.1`, ..., `name.(count - 1)`.
pub fn randomize_name<R: Rng + ?Sized>(rng: &mut R, name: &str, count: u32) -> String {
    variant_name(name, choose_variant(rng, count))
}
