//! Diversity-maximizing reduction of the raw candidate pool.
//!
//! Two raw candidates often represent near-identical material; keeping both
//! wastes an endmember slot. This module scores candidate pairs by a blend
//! of projection-signature overlap and spectral shape, then greedily grows a
//! bounded subset that trades purity against redundancy.
//!
//! All pairwise work is restricted to the raw candidate pool (typically
//! hundreds of rows), never the full pixel count.

use crate::matrix::SpectralMatrix;
use crate::stats;

/// Pool sizes at or below this skip reduction entirely.
const REDUCTION_MIN_POOL: usize = 20;
/// Hard cap on the reduced candidate count.
const MAX_SELECTED: usize = 500;
/// Signature-similarity weight in the combined pairwise score.
const SIGNATURE_WEIGHT: f32 = 0.4;
/// Spectral-similarity weight in the combined pairwise score.
const SPECTRAL_WEIGHT: f32 = 0.6;
/// Greedy growth compares each candidate against this many recent picks.
const DIVERSITY_WINDOW: usize = 15;
/// Purity weight in the greedy growth objective.
const QUALITY_WEIGHT: f32 = 0.65;
/// Diversity weight in the greedy growth objective.
const DIVERSITY_WEIGHT: f32 = 0.35;

/// Per-pixel projection-hit fingerprints, one bit per projection.
///
/// A set bit records that the pixel responded at a moderate-or-above level
/// for that projection. Stored packed; Jaccard similarity reduces to
/// popcounts over the packed words.
pub struct SignatureMatrix {
    stride: usize,
    words: Vec<u64>,
}

impl SignatureMatrix {
    /// All-zero signatures for `pixels` rows of `projections` bits each.
    pub fn new(pixels: usize, projections: usize) -> Self {
        let stride = projections.div_ceil(64);
        Self {
            stride,
            words: vec![0u64; pixels * stride],
        }
    }

    /// Set the bit for one pixel at one projection index.
    #[inline]
    pub fn set(&mut self, pixel: usize, projection: usize) {
        self.words[pixel * self.stride + projection / 64] |= 1u64 << (projection % 64);
    }

    /// Jaccard similarity (intersection over union) between two pixel rows.
    ///
    /// Defined as 0 when both rows are empty.
    pub fn jaccard(&self, a: usize, b: usize) -> f32 {
        let ra = &self.words[a * self.stride..(a + 1) * self.stride];
        let rb = &self.words[b * self.stride..(b + 1) * self.stride];
        let mut intersection = 0u32;
        let mut union = 0u32;
        for (&wa, &wb) in ra.iter().zip(rb) {
            intersection += (wa & wb).count_ones();
            union += (wa | wb).count_ones();
        }
        if union == 0 {
            0.0
        } else {
            intersection as f32 / union as f32
        }
    }
}

/// Cosine similarity between two spectra; 0 when either has zero norm.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (&va, &vb) in a.iter().zip(b) {
        dot += va * vb;
        norm_a += va * va;
        norm_b += vb * vb;
    }
    if norm_a > 0.0 && norm_b > 0.0 {
        dot / (norm_a.sqrt() * norm_b.sqrt())
    } else {
        0.0
    }
}

/// Reduce a raw candidate pool to a bounded, diverse, high-quality subset.
///
/// `candidates` are row indices into `matrix`; `purity_scores` is indexed by
/// row. Pools of 20 or fewer are returned unchanged.
/// The result never exceeds `min(500, pool size)` rows and is emitted in
/// selection order.
pub fn reduce(
    candidates: &[usize],
    purity_scores: &[f32],
    matrix: &SpectralMatrix,
    signatures: &SignatureMatrix,
) -> Vec<usize> {
    let pool = candidates.len();
    if pool <= REDUCTION_MIN_POOL {
        return candidates.to_vec();
    }

    let combined = combined_similarity(candidates, matrix, signatures);

    let pool_scores: Vec<f32> = candidates.iter().map(|&c| purity_scores[c]).collect();
    let (score_min, score_max) = stats::min_max(&pool_scores);
    let score_range = score_max - score_min;

    let max_selected = MAX_SELECTED.min(pool);
    let num_anchors = 10.max((0.1 * max_selected as f32) as usize);

    // Anchor the selection with the highest-purity candidates.
    let mut by_score: Vec<usize> = (0..pool).collect();
    by_score.sort_by(|&a, &b| pool_scores[a].total_cmp(&pool_scores[b]));
    let mut selected: Vec<usize> = by_score[pool - num_anchors.min(pool)..].to_vec();
    let mut remaining: Vec<usize> = (0..pool).filter(|i| !selected.contains(i)).collect();

    while selected.len() < max_selected && !remaining.is_empty() {
        let window_start = selected.len().saturating_sub(DIVERSITY_WINDOW);
        let window = &selected[window_start..];

        let mut best_score = f32::NEG_INFINITY;
        let mut best_pos = None;
        for (pos, &idx) in remaining.iter().enumerate() {
            let mut max_sim = f32::NEG_INFINITY;
            for &sel in window {
                max_sim = max_sim.max(combined[idx * pool + sel]);
            }
            let diversity = 1.0 - max_sim;
            let quality = if score_range > 0.0 {
                (pool_scores[idx] - score_min) / score_range
            } else {
                1.0
            };
            let score = QUALITY_WEIGHT * quality + DIVERSITY_WEIGHT * diversity;
            if score > best_score {
                best_score = score;
                best_pos = Some(pos);
            }
        }

        match best_pos {
            Some(pos) => {
                let idx = remaining.remove(pos);
                selected.push(idx);
            }
            None => break,
        }
    }

    selected.into_iter().map(|i| candidates[i]).collect()
}

/// Dense pool-local pairwise similarity: signature Jaccard blended with
/// spectral cosine. Symmetric, zero diagonal.
fn combined_similarity(
    candidates: &[usize],
    matrix: &SpectralMatrix,
    signatures: &SignatureMatrix,
) -> Vec<f32> {
    let pool = candidates.len();
    let mut combined = vec![0.0f32; pool * pool];
    for k in 0..pool {
        for l in (k + 1)..pool {
            let sig = signatures.jaccard(candidates[k], candidates[l]);
            let spectral =
                cosine_similarity(matrix.row(candidates[k]), matrix.row(candidates[l]));
            let value = SIGNATURE_WEIGHT * sig + SPECTRAL_WEIGHT * spectral;
            combined[k * pool + l] = value;
            combined[l * pool + k] = value;
        }
    }
    combined
}
