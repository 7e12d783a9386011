//! The sparse weight vector over the historical embedding collection.
//!
//! A [`WeightVector`] is a single row of length `n_hist`. In every stable
//! state it holds exactly `k` strictly positive entries, all other entries
//! are exactly zero, and the entries sum to 1.

use crate::error::{Result, SamplerError};

/// Default tolerance used when checking that a vector sums to 1.
pub const SUM_TOLERANCE: f64 = 1e-9;

/// Row vector of mixing weights, shape `(1, n_hist)`.
///
/// Produced by [`crate::sampler::fresh`] and [`crate::sampler::mutate`];
/// ownership passes to the caller, who may hand it back as the prior of the
/// next request. The type does not enforce the sparsity invariant on
/// construction so that arbitrary caller-supplied priors can be inspected
/// and routed by the dispatcher.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct WeightVector {
    values: Vec<f64>,
}

impl WeightVector {
    /// All-zero vector of length `n_hist`.
    pub fn zeros(n_hist: usize) -> Self {
        Self {
            values: vec![0.0; n_hist],
        }
    }

    /// Number of entries (`n_hist`).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` when the vector has no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Row-vector shape `(1, n_hist)`.
    pub fn shape(&self) -> (usize, usize) {
        (1, self.values.len())
    }

    /// Borrow the entries.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Consume the vector and return its entries.
    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }

    /// Entry at position `i`, if in range.
    pub fn get(&self, i: usize) -> Option<f64> {
        self.values.get(i).copied()
    }

    /// Iterate over the entries in position order.
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.values.iter()
    }

    /// Positions holding strictly positive mass, ascending.
    pub fn support(&self) -> Vec<usize> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, &w)| w > 0.0)
            .map(|(i, _)| i)
            .collect()
    }

    /// Count of strictly positive entries.
    pub fn support_count(&self) -> usize {
        self.values.iter().filter(|&&w| w > 0.0).count()
    }

    /// Sum of all entries.
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// `true` when every entry is `>= 0`.
    pub fn is_non_negative(&self) -> bool {
        self.values.iter().all(|&w| w >= 0.0)
    }

    /// `true` when the entries sum to 1 within `tol`.
    pub fn is_normalized(&self, tol: f64) -> bool {
        (self.sum() - 1.0).abs() <= tol
    }

    /// `true` when every entry is a finite number.
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|w| w.is_finite())
    }

    /// Full stable-state check: exactly `k` positive entries, nothing
    /// negative, and a sum of 1 within [`SUM_TOLERANCE`].
    pub fn is_stable(&self, k: usize) -> bool {
        self.support_count() == k && self.is_non_negative() && self.is_normalized(SUM_TOLERANCE)
    }

    /// Scale to unit sum without overflowing.
    ///
    /// # Errors
    ///
    /// [`SamplerError::Degenerate`] when there is no finite positive mass.
    pub(crate) fn normalize(&mut self) -> Result<()> {
        normalize_in_place(&mut self.values)
    }
}

/// Scale `values` so they sum to 1.
///
/// Divides by the largest entry first so that a sum of huge magnitudes cannot
/// overflow to `inf`, then divides by the (now bounded) sum.
pub(crate) fn normalize_in_place(values: &mut [f64]) -> Result<()> {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    if !max.is_finite() || max <= 0.0 {
        return Err(SamplerError::Degenerate(format!(
            "cannot normalize: largest entry is {max}"
        )));
    }
    for v in values.iter_mut() {
        *v /= max;
    }
    let total: f64 = values.iter().sum();
    for v in values.iter_mut() {
        *v /= total;
    }
    Ok(())
}

impl From<Vec<f64>> for WeightVector {
    fn from(values: Vec<f64>) -> Self {
        Self { values }
    }
}

impl From<&[f64]> for WeightVector {
    fn from(values: &[f64]) -> Self {
        Self {
            values: values.to_vec(),
        }
    }
}

impl From<WeightVector> for Vec<f64> {
    fn from(w: WeightVector) -> Self {
        w.values
    }
}

impl AsRef<[f64]> for WeightVector {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}
