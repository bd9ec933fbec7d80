//! Purity-candidate selection: batched projection scoring plus adaptive
//! thresholding.
//!
//! The selector projects every pixel spectrum onto a fresh set of
//! quasi-random unit directions and counts, per pixel, how often it lands
//! in the extreme tails of the projected distribution. Geological
//! endmembers appear at both spectral extremes, so both tails count.
//! Accumulated counts become purity scores, which an adaptive threshold
//! cascade converts into candidate row indices.

use serde::{Deserialize, Serialize};

use crate::diversity::{self, SignatureMatrix};
use crate::error::SelectError;
use crate::matrix::SpectralMatrix;
use crate::progress::{CancelToken, ProgressObserver};
use crate::projections::ProjectionSet;
use crate::stats;

/// Default number of projections per batch.
pub const DEFAULT_BATCH_SIZE: usize = 128;

/// High-confidence tail percentiles (two-sided).
const EXTREME_HIGH_PCT: f32 = 99.0;
const EXTREME_LOW_PCT: f32 = 1.0;
/// Moderate tail percentiles, slow variant only.
const MODERATE_HIGH_PCT: f32 = 97.0;
const MODERATE_LOW_PCT: f32 = 3.0;

/// Hit weights per tail level.
const EXTREME_WEIGHT: f32 = 1.0;
const MODERATE_WEIGHT: f32 = 0.5;

/// Candidate-count floors driving the threshold relaxation cascade.
const FAST_STRICT_FLOOR: usize = 10;
const SLOW_STRICT_FLOOR: usize = 100;
const SLOW_MODERATE_FLOOR: usize = 200;
const SLOW_PERCENTILE_FLOOR: usize = 300;

/// Fallback score percentiles.
const FAST_FALLBACK_PCT: f32 = 98.0;
const SLOW_FALLBACK_PCT: f32 = 97.0;
const SLOW_LAST_RESORT_PCT: f32 = 95.0;

/// Which selection variant to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionVariant {
    /// Single-level tail scoring, no diversity reduction.
    Fast,
    /// Dual-level tail scoring with signature tracking and
    /// diversity-maximizing reduction of the candidate pool.
    Slow,
}

/// Parameters for one selection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurityParams {
    /// Number of quasi-random projections; must be a nonzero power of two,
    /// typically 512 to 16384.
    pub n_projections: usize,
    /// Selection variant.
    pub variant: SelectionVariant,
    /// Projections per batch; bounds peak memory of the projection buffer.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Seed for the projection scramble. Same seed, params, and matrix
    /// reproduce the same candidate set.
    #[serde(default)]
    pub seed: u32,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl PurityParams {
    /// Params with the default batch size and a zero seed.
    pub fn new(n_projections: usize, variant: SelectionVariant) -> Self {
        Self {
            n_projections,
            variant,
            batch_size: DEFAULT_BATCH_SIZE,
            seed: 0,
        }
    }

    /// Builder-style seed override.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    fn validate(&self) -> Result<(), SelectError> {
        if !self.n_projections.is_power_of_two() {
            return Err(SelectError::InvalidInput(format!(
                "n_projections must be a nonzero power of two, got {}",
                self.n_projections
            )));
        }
        if self.batch_size == 0 {
            return Err(SelectError::InvalidInput(
                "batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outcome of a selection run.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionResult {
    /// Candidate row indices into the input matrix, unique, each in
    /// [0, pixels). Ascending out of thresholding; in selection order
    /// after diversity reduction.
    pub candidates: Vec<usize>,
    /// Number of pixels processed.
    pub total_pixels: usize,
    /// Candidates as a percentage of all pixels.
    pub selection_percent: f32,
}

impl SelectionResult {
    /// Per-row overlay mask: true at candidate rows.
    ///
    /// This is the shape the embedding image layer consumes to paint
    /// results back onto pixel coordinates.
    pub fn to_mask(&self) -> Vec<bool> {
        let mut mask = vec![false; self.total_pixels];
        for &c in &self.candidates {
            mask[c] = true;
        }
        mask
    }
}

/// Select endmember-candidate pixels from a spectral matrix.
///
/// The matrix is globally rescaled to [0, 1], projected onto
/// `params.n_projections` scrambled quasi-random unit directions in batches
/// of `params.batch_size`, and each pixel's tail hits are accumulated into
/// a purity score. An adaptive threshold cascade extracts the candidates;
/// the slow variant then applies diversity-maximizing reduction to pools
/// larger than 20.
///
/// `observer` is notified after every batch and once on completion; it is
/// observational only. `cancel`, when supplied, is checked once per batch.
///
/// # Errors
///
/// [`SelectError::InvalidInput`] for contract violations,
/// [`SelectError::DegenerateInput`] for a constant matrix, and
/// [`SelectError::Cancelled`] when the token fires. An empty candidate list
/// is a valid result, not an error.
pub fn select_purity_candidates(
    matrix: &SpectralMatrix,
    params: &PurityParams,
    observer: &mut dyn ProgressObserver,
    cancel: Option<&CancelToken>,
) -> Result<SelectionResult, SelectError> {
    params.validate()?;
    if matrix.bands() < 1 {
        return Err(SelectError::InvalidInput(
            "band count must be at least 1".to_string(),
        ));
    }

    let normalized = matrix.normalized_unit_range()?;
    let pixels = normalized.pixels();
    let n_projections = params.n_projections;

    observer.on_progress(pixels, 0.0, 0);

    let projections = ProjectionSet::generate(normalized.bands(), n_projections, params.seed);

    let mut hit_counts = vec![0.0f32; pixels];
    let mut signatures = match params.variant {
        SelectionVariant::Slow => Some(SignatureMatrix::new(pixels, n_projections)),
        SelectionVariant::Fast => None,
    };

    // Projected values for one batch, column-major per projection.
    let mut projected = vec![0.0f32; pixels * params.batch_size];

    let mut batch_start = 0;
    while batch_start < n_projections {
        if let Some(token) = cancel {
            if token.is_cancelled() {
                return Err(SelectError::Cancelled);
            }
        }

        let batch_end = (batch_start + params.batch_size).min(n_projections);
        let batch_len = batch_end - batch_start;

        for j in 0..batch_len {
            let direction = projections.direction(batch_start + j);
            let column = &mut projected[j * pixels..(j + 1) * pixels];
            for (p, slot) in column.iter_mut().enumerate() {
                *slot = dot(normalized.row(p), direction);
            }
        }

        for j in 0..batch_len {
            let column = &projected[j * pixels..(j + 1) * pixels];
            score_projection(
                column,
                batch_start + j,
                params.variant,
                &mut hit_counts,
                signatures.as_mut(),
            );
        }

        let percent = batch_end as f32 / n_projections as f32 * 100.0;
        let hits = hit_counts.iter().filter(|&&h| h > 0.0).count();
        observer.on_progress(pixels, percent, hits);

        batch_start = batch_end;
    }

    let purity_scores: Vec<f32> = hit_counts
        .iter()
        .map(|&h| h / n_projections as f32)
        .collect();

    let mut candidates = adaptive_threshold(&purity_scores, params.variant);

    if params.variant == SelectionVariant::Slow {
        if let Some(signatures) = &signatures {
            candidates = diversity::reduce(&candidates, &purity_scores, &normalized, signatures);
        }
    }

    let selection_percent = candidates.len() as f32 / pixels as f32 * 100.0;
    observer.on_complete(pixels, candidates.len(), selection_percent);

    Ok(SelectionResult {
        candidates,
        total_pixels: pixels,
        selection_percent,
    })
}

#[inline]
fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(&x, &y)| x * y).sum()
}

/// Score one projection column into the hit accumulator (and signature
/// matrix for the slow variant).
///
/// Tail membership is strict: a value sitting exactly on a percentile does
/// not count as extremal.
fn score_projection(
    column: &[f32],
    projection_index: usize,
    variant: SelectionVariant,
    hit_counts: &mut [f32],
    signatures: Option<&mut SignatureMatrix>,
) {
    let extreme_high = stats::percentile(column, EXTREME_HIGH_PCT);
    let extreme_low = stats::percentile(column, EXTREME_LOW_PCT);

    match variant {
        SelectionVariant::Fast => {
            for (p, &v) in column.iter().enumerate() {
                if v > extreme_high || v < extreme_low {
                    hit_counts[p] += EXTREME_WEIGHT;
                }
            }
        }
        SelectionVariant::Slow => {
            let moderate_high = stats::percentile(column, MODERATE_HIGH_PCT);
            let moderate_low = stats::percentile(column, MODERATE_LOW_PCT);
            if let Some(signatures) = signatures {
                for (p, &v) in column.iter().enumerate() {
                    let extreme = v > extreme_high || v < extreme_low;
                    let moderate = v > moderate_high || v < moderate_low;
                    if extreme {
                        hit_counts[p] += EXTREME_WEIGHT;
                    } else if moderate {
                        hit_counts[p] += MODERATE_WEIGHT;
                    }
                    if moderate {
                        signatures.set(p, projection_index);
                    }
                }
            }
        }
    }
}

/// Row indices whose score strictly exceeds `threshold`, ascending.
fn indices_above(scores: &[f32], threshold: f32) -> Vec<usize> {
    scores
        .iter()
        .enumerate()
        .filter(|(_, &s)| s > threshold)
        .map(|(i, _)| i)
        .collect()
}

/// Convert purity scores to candidates via the relaxation cascade.
///
/// Starts at mu + 2*sigma and relaxes in fixed stages until the stage floor
/// is met, stopping at the first satisfying stage. Every fallback threshold
/// is clamped to the previous stage's, so a later stage can only widen the
/// candidate set. May bottom out empty.
fn adaptive_threshold(scores: &[f32], variant: SelectionVariant) -> Vec<usize> {
    let (mean, std) = stats::mean_std(scores);
    let strict = mean + 2.0 * std;
    let candidates = indices_above(scores, strict);

    match variant {
        SelectionVariant::Fast => {
            if candidates.len() >= FAST_STRICT_FLOOR {
                return candidates;
            }
            let fallback = stats::percentile(scores, FAST_FALLBACK_PCT).min(strict);
            indices_above(scores, fallback)
        }
        SelectionVariant::Slow => {
            if candidates.len() >= SLOW_STRICT_FLOOR {
                return candidates;
            }
            let moderate = mean + 1.5 * std;
            let candidates = indices_above(scores, moderate);
            if candidates.len() >= SLOW_MODERATE_FLOOR {
                return candidates;
            }
            let fallback = stats::percentile(scores, SLOW_FALLBACK_PCT).min(moderate);
            let candidates = indices_above(scores, fallback);
            if candidates.len() >= SLOW_PERCENTILE_FLOOR {
                return candidates;
            }
            let last_resort = stats::percentile(scores, SLOW_LAST_RESORT_PCT).min(fallback);
            indices_above(scores, last_resort)
        }
    }
}
