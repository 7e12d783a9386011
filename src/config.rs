//! Sampling configuration.

use crate::error::{Result, SamplerError};

/// Knobs for one exploration step.
///
/// `n_hist` is not part of the config: it comes from the embedding store at
/// call time, so the upper bound on `n_dim_to_keep` is checked per call by
/// [`SamplerConfig::validate`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplerConfig {
    /// Number of strictly positive entries every returned vector carries.
    /// Default: 8.
    pub n_dim_to_keep: usize,

    /// Standard deviation of the Gaussian noise added during mutation.
    /// Default: 0.01.
    pub std: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            n_dim_to_keep: 8,
            std: 0.01,
        }
    }
}

impl SamplerConfig {
    /// Checks that do not depend on the collection size.
    pub fn validate_params(&self) -> Result<()> {
        validate_k(self.n_dim_to_keep, None)?;
        validate_std(self.std)
    }

    /// Full check against a collection of `n_hist` embeddings.
    pub fn validate(&self, n_hist: usize) -> Result<()> {
        validate_n_hist(n_hist)?;
        validate_k(self.n_dim_to_keep, Some(n_hist))?;
        validate_std(self.std)
    }
}

pub(crate) fn validate_n_hist(n_hist: usize) -> Result<()> {
    if n_hist == 0 {
        return Err(SamplerError::InvalidConfiguration(
            "n_hist must be > 0".into(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_k(k: usize, n_hist: Option<usize>) -> Result<()> {
    if k == 0 {
        return Err(SamplerError::InvalidConfiguration(
            "n_dim_to_keep must be >= 1".into(),
        ));
    }
    match n_hist {
        Some(n) if k > n => Err(SamplerError::InvalidConfiguration(format!(
            "n_dim_to_keep ({k}) exceeds n_hist ({n})"
        ))),
        _ => Ok(()),
    }
}

pub(crate) fn validate_std(std: f64) -> Result<()> {
    if !std.is_finite() || std <= 0.0 {
        return Err(SamplerError::InvalidConfiguration(format!(
            "std must be finite and > 0, got {std}"
        )));
    }
    Ok(())
}
