//! CMAC tile coding
//!
//! Grid-style tile codings after the UNH CMAC scheme: floating-point inputs
//! are gridded at unit intervals, each of the `num_tilings` tilings is offset
//! by a different displacement per dimension, and every activated tile is
//! hashed into a table of `memory_size` entries. Integer inputs take part in
//! the hash without any generalization across values. Hash collisions
//! between dissimilar inputs are ignored.

use std::sync::OnceLock;

use rand::{Rng, SeedableRng, rngs::StdRng};

const RANDOM_TABLE_SIZE: i64 = 2048;
const RANDOM_TABLE_SEED: u64 = 0x5eed_ca4c;
const HASH_INCREMENT: i64 = 449;

/// Random offsets shared by every tile coder in the process.
///
/// Seeded with a fixed value so tile indices are stable across runs, which
/// keeps persisted weight tables meaningful after reload.
fn random_table() -> &'static [u32] {
    static TABLE: OnceLock<Vec<u32>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut rng = StdRng::seed_from_u64(RANDOM_TABLE_SEED);
        (0..RANDOM_TABLE_SIZE).map(|_| rng.random::<u32>()).collect()
    })
}

/// Hash a coordinate list into `[0, memory_size)`.
fn hash_coordinates(coordinates: &[i64], memory_size: usize, increment: i64) -> usize {
    let table = random_table();
    let sum: i64 = coordinates
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let index = c
                .wrapping_add(increment.wrapping_mul(i as i64))
                .rem_euclid(RANDOM_TABLE_SIZE);
            i64::from(table[index as usize])
        })
        .sum();
    sum.rem_euclid(memory_size as i64) as usize
}

/// Map a mixed float/integer input to one tile index per tiling.
///
/// `num_tilings` and `memory_size` must both be non-zero.
pub fn tiles(num_tilings: usize, memory_size: usize, floats: &[f32], ints: &[i32]) -> Vec<usize> {
    debug_assert!(num_tilings > 0 && memory_size > 0);

    let num_floats = floats.len();
    let tilings = num_tilings as i64;

    let mut coordinates = vec![0i64; num_floats + 1 + ints.len()];
    for (slot, &value) in coordinates[num_floats + 1..].iter_mut().zip(ints) {
        *slot = i64::from(value);
    }

    // tile widths become `num_tilings` in the quantized space; huge inputs
    // saturate here, so the grid arithmetic below wraps instead of overflowing
    let quantized: Vec<i64> = floats
        .iter()
        .map(|&value| (value * num_tilings as f32).floor() as i64)
        .collect();
    let mut base = vec![0i64; num_floats];

    (0..num_tilings)
        .map(|tiling| {
            for i in 0..num_floats {
                let offset = quantized[i].wrapping_sub(base[i]).rem_euclid(tilings);
                coordinates[i] = quantized[i].wrapping_sub(offset);
                base[i] += 1 + 2 * i as i64;
            }
            coordinates[num_floats] = tiling as i64;
            hash_coordinates(&coordinates, memory_size, HASH_INCREMENT)
        })
        .collect()
}
