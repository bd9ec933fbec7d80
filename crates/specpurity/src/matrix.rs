//! Spectral matrix storage and global-range normalization.
//!
//! A [`SpectralMatrix`] holds one spectrum per pixel, row-major. Rows map
//! 1:1 to a caller-held list of image coordinates; this crate only ever
//! deals in row indices.

use crate::error::SelectError;

/// A (pixels x bands) spectral matrix, row-major `f32`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralMatrix {
    pixels: usize,
    bands: usize,
    data: Vec<f32>,
}

impl SpectralMatrix {
    /// Create a matrix from flat row-major data.
    ///
    /// Requires at least one pixel, at least one band, and
    /// `data.len() == pixels * bands`.
    pub fn new(pixels: usize, bands: usize, data: Vec<f32>) -> Result<Self, SelectError> {
        if pixels < 1 {
            return Err(SelectError::InvalidInput(
                "pixel count must be at least 1".to_string(),
            ));
        }
        if bands < 1 {
            return Err(SelectError::InvalidInput(
                "band count must be at least 1".to_string(),
            ));
        }
        if data.len() != pixels * bands {
            return Err(SelectError::InvalidInput(format!(
                "data length {} does not match {} pixels x {} bands",
                data.len(),
                pixels,
                bands
            )));
        }
        Ok(Self {
            pixels,
            bands,
            data,
        })
    }

    /// Create a matrix from per-pixel spectrum rows.
    ///
    /// All rows must have the same nonzero length.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self, SelectError> {
        let pixels = rows.len();
        if pixels < 1 {
            return Err(SelectError::InvalidInput(
                "pixel count must be at least 1".to_string(),
            ));
        }
        let bands = rows[0].len();
        let mut data = Vec::with_capacity(pixels * bands);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != bands {
                return Err(SelectError::InvalidInput(format!(
                    "row {} has {} bands, expected {}",
                    i,
                    row.len(),
                    bands
                )));
            }
            data.extend_from_slice(row);
        }
        Self::new(pixels, bands, data)
    }

    /// Number of pixels (rows).
    #[inline]
    pub fn pixels(&self) -> usize {
        self.pixels
    }

    /// Number of spectral bands (columns).
    #[inline]
    pub fn bands(&self) -> usize {
        self.bands
    }

    /// The spectrum of one pixel.
    #[inline]
    pub fn row(&self, pixel: usize) -> &[f32] {
        let start = pixel * self.bands;
        &self.data[start..start + self.bands]
    }

    /// Global minimum and maximum over the whole matrix.
    pub fn global_range(&self) -> (f32, f32) {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in &self.data {
            min = min.min(v);
            max = max.max(v);
        }
        (min, max)
    }

    /// Rescale the whole matrix uniformly to [0, 1] using the single global
    /// minimum and maximum (not per-band).
    ///
    /// A constant matrix has no range to rescale and is rejected as
    /// [`SelectError::DegenerateInput`].
    pub fn normalized_unit_range(&self) -> Result<SpectralMatrix, SelectError> {
        let (min, max) = self.global_range();
        if max == min {
            return Err(SelectError::DegenerateInput);
        }
        let scale = 1.0 / (max - min);
        let data = self.data.iter().map(|&v| (v - min) * scale).collect();
        Ok(SpectralMatrix {
            pixels: self.pixels,
            bands: self.bands,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_shapes() {
        assert!(matches!(
            SpectralMatrix::new(0, 3, vec![]),
            Err(SelectError::InvalidInput(_))
        ));
        assert!(matches!(
            SpectralMatrix::new(2, 0, vec![]),
            Err(SelectError::InvalidInput(_))
        ));
        assert!(matches!(
            SpectralMatrix::new(2, 3, vec![0.0; 5]),
            Err(SelectError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            SpectralMatrix::from_rows(&rows),
            Err(SelectError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_row_access() {
        let m = SpectralMatrix::new(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.row(0), &[1.0, 2.0, 3.0]);
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_global_range() {
        let m = SpectralMatrix::new(2, 2, vec![-1.0, 4.0, 0.5, 2.0]).unwrap();
        assert_eq!(m.global_range(), (-1.0, 4.0));
    }

    #[test]
    fn test_normalization_is_global_not_per_band() {
        let m = SpectralMatrix::new(2, 2, vec![0.0, 10.0, 5.0, 20.0]).unwrap();
        let n = m.normalized_unit_range().unwrap();
        assert_eq!(n.row(0), &[0.0, 0.5]);
        assert_eq!(n.row(1), &[0.25, 1.0]);
    }

    #[test]
    fn test_normalization_idempotent_on_unit_range() {
        let m = SpectralMatrix::new(2, 2, vec![0.0, 0.25, 0.75, 1.0]).unwrap();
        let n = m.normalized_unit_range().unwrap();
        for (a, b) in [0.0f32, 0.25, 0.75, 1.0].iter().zip(n.row(0).iter().chain(n.row(1))) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_constant_matrix_is_degenerate() {
        let m = SpectralMatrix::new(3, 2, vec![2.5; 6]).unwrap();
        assert_eq!(m.normalized_unit_range(), Err(SelectError::DegenerateInput));
    }
}
