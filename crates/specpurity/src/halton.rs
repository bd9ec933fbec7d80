//! Scrambled Halton low-discrepancy sequence.
//!
//! Quasi-random points cover direction space more evenly than pseudorandom
//! sampling for a fixed small sample count, which stabilizes extremal-point
//! detection. The Halton construction is table-free, so it supports any
//! number of spectral bands: dimension `d` uses the `d`-th prime as its
//! radix, and each dimension's digits are permuted by a seeded permutation
//! to break the correlation between high-dimensional coordinates.

use crate::rng::DeterministicRng;

/// A digit-scrambled Halton sequence over a fixed number of dimensions.
#[derive(Clone)]
pub struct ScrambledHalton {
    bases: Vec<u32>,
    /// One digit permutation per dimension; entry 0 is always fixed at 0 so
    /// that omitted leading digits of the index contribute nothing.
    permutations: Vec<Vec<u16>>,
}

impl ScrambledHalton {
    /// Create a sequence over `dimensions` axes, scrambled from `seed`.
    pub fn new(dimensions: usize, seed: u32) -> Self {
        let bases = first_primes(dimensions);
        let mut permutations = Vec::with_capacity(dimensions);
        for (d, &base) in bases.iter().enumerate() {
            let mut rng =
                DeterministicRng::new(DeterministicRng::derive_dimension_seed(seed, d as u32));
            let mut perm: Vec<u16> = (0..base as u16).collect();
            rng.shuffle(&mut perm[1..]);
            permutations.push(perm);
        }
        Self {
            bases,
            permutations,
        }
    }

    /// Number of dimensions.
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.bases.len()
    }

    /// Write the point at `index` into `out`, one coordinate per dimension.
    ///
    /// Each coordinate lies in [0, 1). Index 0 is the origin in every
    /// dimension; callers wanting nonzero points should start at index 1.
    pub fn point_into(&self, index: u64, out: &mut [f32]) {
        debug_assert_eq!(out.len(), self.dimensions());
        for (d, slot) in out.iter_mut().enumerate() {
            *slot = Self::radical_inverse(self.bases[d], &self.permutations[d], index);
        }
    }

    /// Permuted radical inverse of `index` in the given base.
    fn radical_inverse(base: u32, perm: &[u16], index: u64) -> f32 {
        let b = base as u64;
        let mut inv = 1.0f64 / base as f64;
        let mut value = 0.0f64;
        let mut i = index;
        while i > 0 {
            let digit = (i % b) as usize;
            value += perm[digit] as f64 * inv;
            inv /= base as f64;
            i /= b;
        }
        value as f32
    }
}

/// The first `n` primes, by trial division.
fn first_primes(n: usize) -> Vec<u32> {
    let mut primes: Vec<u32> = Vec::with_capacity(n);
    let mut candidate = 2u32;
    while primes.len() < n {
        if primes
            .iter()
            .take_while(|&&p| p * p <= candidate)
            .all(|&p| candidate % p != 0)
        {
            primes.push(candidate);
        }
        candidate += 1;
    }
    primes
}
