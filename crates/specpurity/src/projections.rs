//! Unit projection directions drawn from the scrambled Halton sequence.

use crate::halton::ScrambledHalton;

/// A set of unit-norm direction vectors in band space, row-major.
///
/// Regenerated fresh per invocation; there is no cross-call state.
#[derive(Clone)]
pub struct ProjectionSet {
    bands: usize,
    count: usize,
    directions: Vec<f32>,
}

impl ProjectionSet {
    /// Generate `count` unit directions in `bands`-dimensional space.
    ///
    /// Sequence indices start at 1 so the origin is never drawn; a
    /// zero-norm draw (possible only through float underflow) falls back
    /// to the uniform diagonal direction.
    pub fn generate(bands: usize, count: usize, seed: u32) -> Self {
        let sequence = ScrambledHalton::new(bands, seed);
        let mut directions = vec![0.0f32; bands * count];
        let uniform = (1.0 / (bands as f32)).sqrt();
        for i in 0..count {
            let row = &mut directions[i * bands..(i + 1) * bands];
            sequence.point_into((i + 1) as u64, row);
            let norm = row.iter().map(|&v| v * v).sum::<f32>().sqrt();
            if norm > 0.0 {
                for v in row.iter_mut() {
                    *v /= norm;
                }
            } else {
                for v in row.iter_mut() {
                    *v = uniform;
                }
            }
        }
        Self {
            bands,
            count,
            directions,
        }
    }

    /// Number of directions.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// True when the set holds no directions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of bands each direction spans.
    #[inline]
    pub fn bands(&self) -> usize {
        self.bands
    }

    /// One direction vector.
    #[inline]
    pub fn direction(&self, index: usize) -> &[f32] {
        let start = index * self.bands;
        &self.directions[start..start + self.bands]
    }
}
