//! Historical embedding matrix and style-vector combination.
//!
//! The sampling core only needs the row count of the collection. This module
//! owns the rows themselves and turns a weight vector into a style vector:
//!
//! ```text
//! style = weights (1 × n_hist) · embeddings (n_hist × dim)  →  (1 × dim)
//! ```

use crate::error::{Result, SamplerError};
use crate::weights::WeightVector;

/// Dense row-major matrix of historical embeddings.
#[derive(Clone, Debug, PartialEq)]
pub struct EmbeddingMatrix {
    data: Vec<f32>,
    rows: usize,
    dim: usize,
}

impl EmbeddingMatrix {
    /// Build from one `Vec` per historical embedding.
    ///
    /// # Errors
    ///
    /// - [`SamplerError::InvalidConfiguration`] — no rows, or zero-width rows.
    /// - [`SamplerError::RaggedEmbeddings`] — rows of differing dimension.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let dim = match rows.first() {
            Some(first) => first.len(),
            None => {
                return Err(SamplerError::InvalidConfiguration(
                    "embedding matrix has no rows".into(),
                ))
            }
        };
        if dim == 0 {
            return Err(SamplerError::InvalidConfiguration(
                "embedding rows must have dimension > 0".into(),
            ));
        }

        let n = rows.len();
        let mut data = Vec::with_capacity(n * dim);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != dim {
                return Err(SamplerError::RaggedEmbeddings {
                    row,
                    expected: dim,
                    actual: values.len(),
                });
            }
            data.extend(values);
        }
        Ok(Self { data, rows: n, dim })
    }

    /// Build from a flat row-major buffer of `rows × dim` values.
    pub fn from_flat(data: Vec<f32>, dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(SamplerError::InvalidConfiguration(
                "embedding dimension must be > 0".into(),
            ));
        }
        if data.is_empty() || data.len() % dim != 0 {
            return Err(SamplerError::InvalidConfiguration(format!(
                "flat buffer of {} values is not a non-empty multiple of dim {dim}",
                data.len()
            )));
        }
        let rows = data.len() / dim;
        Ok(Self { data, rows, dim })
    }

    /// Number of historical embeddings (`n_hist`).
    pub fn n_hist(&self) -> usize {
        self.rows
    }

    /// Embedding dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Row `i`, if in range.
    pub fn row(&self, i: usize) -> Option<&[f32]> {
        if i >= self.rows {
            return None;
        }
        Some(&self.data[i * self.dim..(i + 1) * self.dim])
    }

    /// Linear combination of the rows using `weights`.
    ///
    /// Zero weights skip their row entirely, so the cost is proportional to
    /// the support size rather than `n_hist`.
    ///
    /// # Errors
    ///
    /// [`SamplerError::ShapeMismatch`] when `weights.len() != n_hist()`.
    pub fn style_vector(&self, weights: &WeightVector) -> Result<Vec<f64>> {
        if weights.len() != self.rows {
            return Err(SamplerError::ShapeMismatch {
                expected: self.rows,
                actual: weights.len(),
            });
        }
        let mut style = vec![0.0_f64; self.dim];
        for (row, &w) in self.data.chunks_exact(self.dim).zip(weights.iter()) {
            if w == 0.0 {
                continue;
            }
            for (acc, &x) in style.iter_mut().zip(row) {
                *acc += w * f64::from(x);
            }
        }
        Ok(style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> EmbeddingMatrix {
        EmbeddingMatrix::from_rows(vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![1.0, 1.0, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn dimensions_are_reported() {
        let m = matrix();
        assert_eq!(m.n_hist(), 4);
        assert_eq!(m.dim(), 3);
        assert_eq!(m.row(3), Some(&[1.0_f32, 1.0, 1.0][..]));
        assert_eq!(m.row(4), None);
    }

    #[test]
    fn one_hot_weights_select_a_row() {
        let m = matrix();
        let w = WeightVector::from(vec![0.0, 1.0, 0.0, 0.0]);
        assert_eq!(m.style_vector(&w).unwrap(), vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn mixed_weights_blend_rows() {
        let m = matrix();
        let w = WeightVector::from(vec![0.5, 0.0, 0.25, 0.25]);
        let style = m.style_vector(&w).unwrap();
        assert!((style[0] - 0.75).abs() < 1e-12);
        assert!((style[1] - 0.25).abs() < 1e-12);
        assert!((style[2] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn wrong_weight_length_is_shape_mismatch() {
        let m = matrix();
        let w = WeightVector::from(vec![1.0, 0.0]);
        assert_eq!(
            m.style_vector(&w),
            Err(SamplerError::ShapeMismatch {
                expected: 4,
                actual: 2
            })
        );
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = EmbeddingMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            SamplerError::RaggedEmbeddings {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn empty_inputs_are_rejected() {
        assert!(EmbeddingMatrix::from_rows(vec![]).is_err());
        assert!(EmbeddingMatrix::from_rows(vec![vec![]]).is_err());
        assert!(EmbeddingMatrix::from_flat(vec![], 3).is_err());
        assert!(EmbeddingMatrix::from_flat(vec![1.0; 5], 2).is_err());
        assert!(EmbeddingMatrix::from_flat(vec![1.0; 4], 0).is_err());
    }

    #[test]
    fn flat_and_row_constructors_agree() {
        let flat = EmbeddingMatrix::from_flat(vec![1.0, 2.0, 3.0, 4.0], 2).unwrap();
        let rows = EmbeddingMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(flat, rows);
    }
}
