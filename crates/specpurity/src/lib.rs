//! Pixel Purity Index (PPI) endmember-candidate selection.
//!
//! This crate selects candidate "pure" pixels from a spectral matrix
//! (pixels x bands): the rows most likely to be endmembers, the pure
//! material spectra that mix into everything else in a scene. It is a
//! pure in-process core: the caller extracts the matrix from a raster
//! however it likes and maps the returned row indices back onto image
//! coordinates itself.
//!
//! # Algorithm
//!
//! 1. Rescale the matrix to [0, 1] using its single global min/max.
//! 2. Draw N scrambled quasi-random unit directions (N a power of two).
//! 3. Project all pixels onto the directions in memory-bounded batches,
//!    counting per pixel how often it falls in the extreme tails of the
//!    projected distribution (both tails; endmembers sit at both ends).
//! 4. Convert counts to purity scores and apply an adaptive threshold
//!    cascade that relaxes until a candidate floor is met.
//! 5. Slow variant only: greedily reduce large candidate pools to a
//!    bounded subset balancing purity against spectral redundancy.
//!
//! # Example
//!
//! ```
//! use specpurity::{
//!     select_purity_candidates, NoProgress, PurityParams, SelectionVariant, SpectralMatrix,
//! };
//!
//! // 200 background pixels plus one bright outlier across 5 bands.
//! let mut rows = vec![vec![0.0f32; 5]; 200];
//! rows[57] = vec![1.0; 5];
//! let matrix = SpectralMatrix::from_rows(&rows).unwrap();
//!
//! let params = PurityParams::new(512, SelectionVariant::Fast).with_seed(42);
//! let result = select_purity_candidates(&matrix, &params, &mut NoProgress, None).unwrap();
//! assert!(result.candidates.contains(&57));
//! ```
//!
//! # Determinism
//!
//! Same matrix + same [`PurityParams`] (including seed) = identical
//! candidate set. All randomness flows through a PCG32 generator seeded
//! from the caller seed, with per-dimension sub-seeds derived via BLAKE3.

pub mod diversity;
pub mod error;
pub mod halton;
pub mod matrix;
pub mod progress;
pub mod projections;
pub mod rng;
pub mod select;
pub mod stats;

pub use error::SelectError;
pub use matrix::SpectralMatrix;
pub use progress::{CancelToken, NoProgress, ProgressObserver};
pub use projections::ProjectionSet;
pub use select::{
    select_purity_candidates, PurityParams, SelectionResult, SelectionVariant, DEFAULT_BATCH_SIZE,
};
