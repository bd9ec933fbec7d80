//! Property tests for the public pipeline: candidate validity, determinism,
//! and the diversity-reduction bound.

use proptest::prelude::*;

use specpurity::diversity::{reduce, SignatureMatrix};
use specpurity::{
    select_purity_candidates, NoProgress, PurityParams, SelectError, SelectionVariant,
    SpectralMatrix,
};

/// Strategy for small spectral matrices with values in [0, 1].
fn matrix_strategy() -> impl Strategy<Value = SpectralMatrix> {
    (4usize..48, 1usize..6).prop_flat_map(|(pixels, bands)| {
        proptest::collection::vec(0.0f32..=1.0, pixels * bands)
            .prop_map(move |data| SpectralMatrix::new(pixels, bands, data).unwrap())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_candidates_are_valid_unique_row_indices(
        matrix in matrix_strategy(),
        seed in proptest::num::u32::ANY,
        slow in proptest::bool::ANY,
    ) {
        let variant = if slow {
            SelectionVariant::Slow
        } else {
            SelectionVariant::Fast
        };
        let params = PurityParams::new(64, variant).with_seed(seed);
        match select_purity_candidates(&matrix, &params, &mut NoProgress, None) {
            Ok(result) => {
                let mut sorted = result.candidates.clone();
                sorted.sort_unstable();
                sorted.dedup();
                prop_assert_eq!(sorted.len(), result.candidates.len());
                for &idx in &result.candidates {
                    prop_assert!(idx < matrix.pixels());
                }
            }
            // The generator can emit a constant matrix.
            Err(SelectError::DegenerateInput) => {}
            Err(other) => return Err(TestCaseError::fail(format!("unexpected error: {other}"))),
        }
    }

    #[test]
    fn prop_selection_is_deterministic_given_seed(
        matrix in matrix_strategy(),
        seed in proptest::num::u32::ANY,
    ) {
        let params = PurityParams::new(64, SelectionVariant::Slow).with_seed(seed);
        let a = select_purity_candidates(&matrix, &params, &mut NoProgress, None);
        let b = select_purity_candidates(&matrix, &params, &mut NoProgress, None);
        prop_assert_eq!(a, b);
    }
}

#[test]
fn test_reduction_caps_oversized_pools_at_500() {
    let pool = 600;
    let bands = 4;
    let rows: Vec<Vec<f32>> = (0..pool)
        .map(|i| {
            let x = i as f32 / pool as f32;
            vec![x, 1.0 - x, (x * 13.0).sin().abs(), (x * 5.0).cos().abs()]
        })
        .collect();
    let matrix = SpectralMatrix::from_rows(&rows).unwrap();

    let mut signatures = SignatureMatrix::new(pool, 128);
    for i in 0..pool {
        signatures.set(i, i % 128);
        signatures.set(i, (i * 7) % 128);
    }
    let scores: Vec<f32> = (0..pool).map(|i| (i as f32 * 0.618).fract()).collect();
    let candidates: Vec<usize> = (0..pool).collect();

    let reduced = reduce(&candidates, &scores, &matrix, &signatures);
    assert_eq!(reduced.len(), 500);

    let mut sorted = reduced.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), 500, "reduced set must have no duplicates");
    for &idx in &reduced {
        assert!(idx < pool);
    }
}
