//! Python FFI bindings via PyO3.
//!
//! Exposes the sampler to the Python service that loads the embedding dataset
//! and talks to image generation. Weight vectors cross the boundary as plain
//! lists of floats.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! import numpy as np
//! from stylewalk_core import Sampler, sample, style_vector
//!
//! embeddings = np.vstack(dataset["train"]["embedding"])
//!
//! weights = sample(embeddings.shape[0], None, std=0.01, n_dim_to_keep=8)
//! weights = sample(embeddings.shape[0], weights, std=0.01, n_dim_to_keep=8)
//! style = style_vector(weights, embeddings.tolist())
//!
//! s = Sampler(n_dim_to_keep=5, std=0.05, seed=7)
//! w = s.sample(embeddings.shape[0])
//! w = s.sample(embeddings.shape[0], w)
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use rand::rngs::StdRng;

use crate::config::SamplerConfig;
use crate::error::SamplerError;
use crate::sampler::{sample_with_thread_rng, Sampler as RustSampler};
use crate::style::EmbeddingMatrix;
use crate::weights::WeightVector;

impl From<SamplerError> for PyErr {
    fn from(e: SamplerError) -> Self {
        PyValueError::new_err(e.to_string())
    }
}

// ── Sampler ───────────────────────────────────────────────────────────────────

/// Seedable explorer session.
///
/// Holds its own generator so repeated calls with the same seed replay the
/// same sequence of weights.
#[pyclass(name = "Sampler")]
pub struct PySampler {
    inner: RustSampler<StdRng>,
}

#[pymethods]
impl PySampler {
    /// Create a new Sampler.
    ///
    /// Args:
    ///     n_dim_to_keep: number of non-zero weights per vector (default 8)
    ///     std:           perturbation scale for follow-up steps (default 0.01)
    ///     seed:          optional seed; OS entropy when omitted
    #[new]
    #[pyo3(signature = (n_dim_to_keep=8, std=0.01, seed=None))]
    pub fn new(n_dim_to_keep: usize, std: f64, seed: Option<u64>) -> PyResult<Self> {
        let config = SamplerConfig { n_dim_to_keep, std };
        let inner = match seed {
            Some(seed) => RustSampler::seeded(config, seed)?,
            None => RustSampler::from_entropy(config)?,
        };
        Ok(Self { inner })
    }

    /// Produce the next weight vector.
    ///
    /// Args:
    ///     n_hist:  number of historical embeddings
    ///     weights: previous weights (length n_hist) or None
    ///
    /// Returns:
    ///     list of n_hist floats summing to 1
    #[pyo3(signature = (n_hist, weights=None))]
    pub fn sample(&mut self, n_hist: usize, weights: Option<Vec<f64>>) -> PyResult<Vec<f64>> {
        let prior = weights.map(WeightVector::from);
        Ok(self.inner.step(n_hist, prior.as_ref())?.into_vec())
    }

    /// Returns the sparsity target.
    #[getter]
    pub fn n_dim_to_keep(&self) -> usize {
        self.inner.config().n_dim_to_keep
    }

    /// Returns the perturbation scale.
    #[getter]
    pub fn std(&self) -> f64 {
        self.inner.config().std
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        format!(
            "Sampler(n_dim_to_keep={}, std={})",
            self.inner.config().n_dim_to_keep,
            self.inner.config().std,
        )
    }
}

// ── Free functions ────────────────────────────────────────────────────────────

/// Produce the next weight vector using the calling thread's generator.
///
/// Args:
///     n_hist_artists: number of historical embeddings
///     weights:        previous weights (length n_hist_artists) or None
///     std:            perturbation scale (default 0.01)
///     n_dim_to_keep:  number of non-zero weights (default 8)
#[pyfunction]
#[pyo3(name = "sample", signature = (n_hist_artists, weights=None, std=0.01, n_dim_to_keep=8))]
pub fn py_sample(
    n_hist_artists: usize,
    weights: Option<Vec<f64>>,
    std: f64,
    n_dim_to_keep: usize,
) -> PyResult<Vec<f64>> {
    let prior = weights.map(WeightVector::from);
    Ok(sample_with_thread_rng(n_hist_artists, prior.as_ref(), n_dim_to_keep, std)?.into_vec())
}

/// Linear combination of embedding rows.
///
/// Args:
///     weights:    n_hist floats
///     embeddings: n_hist rows of equal length
///
/// Returns:
///     style vector with one entry per embedding dimension
#[pyfunction]
pub fn style_vector(weights: Vec<f64>, embeddings: Vec<Vec<f32>>) -> PyResult<Vec<f64>> {
    let matrix = EmbeddingMatrix::from_rows(embeddings)?;
    Ok(matrix.style_vector(&WeightVector::from(weights))?)
}

// ── Module entry point ────────────────────────────────────────────────────────

/// Sparse style-space exploration bindings.
#[pymodule]
pub fn stylewalk_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySampler>()?;
    m.add_function(wrap_pyfunction!(py_sample, m)?)?;
    m.add_function(wrap_pyfunction!(style_vector, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
