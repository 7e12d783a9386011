//! Sparse weight-vector sampling and mutation.
//!
//! # The problem in plain English
//!
//! A caller explores a style space one step at a time. Each step produces a
//! weight vector over the historical collection. The first step (or any step
//! whose prior no longer has the right number of active entries) draws a
//! fresh sparse vector. Every later step nudges the previous vector a little,
//! so consecutive styles stay close to each other.
//!
//! # The two paths
//!
//! **Fresh** — draw `k` magnitudes from a flat Dirichlet (uniform over the
//! simplex) and drop them onto `k` distinct random positions.
//!
//! **Perturb** — add Gaussian noise to the active entries. Entries that go
//! negative leave their slot; their mass (sign flipped) moves to a randomly
//! chosen zero slot anywhere in the vector, so the active count never
//! changes. The result is renormalized.
//!
//! ```text
//! prior ──► route ──┬── None / wrong cardinality ──► fresh ──┐
//!                   └── k active entries ──────────► mutate ─┴─► WeightVector
//! ```
//!
//! # Invariants on every returned vector
//!
//! - length `n_hist`, shape `(1, n_hist)`
//! - exactly `k` strictly positive entries, the rest exactly `0.0`
//! - all entries `>= 0`
//! - entries sum to 1 within [`crate::weights::SUM_TOLERANCE`]
//!
//! The random source is always passed in. Nothing here touches global state,
//! so concurrent callers only need independent generators (see
//! [`sample_with_thread_rng`]).

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_distr::{Dirichlet, Distribution, Normal};
use tracing::{debug, trace};

use crate::config::{validate_k, validate_n_hist, validate_std, SamplerConfig};
use crate::error::{Result, SamplerError};
use crate::weights::{normalize_in_place, WeightVector};

// ─── Route ──────────────────────────────────────────────────────────────────

/// Which path the dispatcher takes for a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// Draw a new sparse vector from scratch.
    Fresh,
    /// Perturb the prior while keeping its cardinality.
    Perturb,
}

/// Cardinality check: decide how a request with this prior is served.
///
/// Returns [`Route::Fresh`] when there is no prior or its count of strictly
/// positive entries differs from `n_dim_to_keep`, [`Route::Perturb`]
/// otherwise.
///
/// # Errors
///
/// [`SamplerError::ShapeMismatch`] when the prior's length is not `n_hist`.
pub fn route(
    n_hist: usize,
    weights: Option<&WeightVector>,
    n_dim_to_keep: usize,
) -> Result<Route> {
    let Some(prior) = weights else {
        return Ok(Route::Fresh);
    };
    if prior.len() != n_hist {
        return Err(SamplerError::ShapeMismatch {
            expected: n_hist,
            actual: prior.len(),
        });
    }
    if prior.support_count() == n_dim_to_keep {
        Ok(Route::Perturb)
    } else {
        Ok(Route::Fresh)
    }
}

// ─── Dispatcher ─────────────────────────────────────────────────────────────

/// Produce the next weight vector for a request.
///
/// Routes to [`fresh`] or [`mutate`] according to [`route`]. A prior with the
/// wrong cardinality is discarded entirely; its support has no influence on
/// the fresh draw.
///
/// # Errors
///
/// - [`SamplerError::ShapeMismatch`] — prior length differs from `n_hist`.
/// - [`SamplerError::InvalidConfiguration`] — `n_hist == 0`,
///   `n_dim_to_keep` outside `[1, n_hist]`, `std` not finite and positive,
///   or a prior containing non-finite values.
pub fn sample<R: Rng + ?Sized>(
    n_hist: usize,
    weights: Option<&WeightVector>,
    n_dim_to_keep: usize,
    std: f64,
    rng: &mut R,
) -> Result<WeightVector> {
    validate_n_hist(n_hist)?;
    let route = route(n_hist, weights, n_dim_to_keep)?;
    validate_k(n_dim_to_keep, Some(n_hist))?;
    validate_std(std)?;
    if let Some(prior) = weights {
        if !prior.is_finite() {
            return Err(SamplerError::InvalidConfiguration(
                "prior weights must be finite".into(),
            ));
        }
    }

    match (route, weights) {
        (Route::Perturb, Some(prior)) => {
            debug!(n_hist, k = n_dim_to_keep, std, "perturbing prior weights");
            mutate(prior, std, rng)
        }
        (_, prior) => {
            debug!(
                n_hist,
                k = n_dim_to_keep,
                prior_support = prior.map(WeightVector::support_count),
                "drawing fresh weights"
            );
            fresh(n_hist, n_dim_to_keep, rng)
        }
    }
}

/// [`sample`] backed by the calling thread's generator.
///
/// Each thread draws from its own stream, so simultaneous requests on
/// different threads never share or correlate random state.
pub fn sample_with_thread_rng(
    n_hist: usize,
    weights: Option<&WeightVector>,
    n_dim_to_keep: usize,
    std: f64,
) -> Result<WeightVector> {
    sample(n_hist, weights, n_dim_to_keep, std, &mut rand::thread_rng())
}

// ─── Fresh sampler ──────────────────────────────────────────────────────────

/// Draw a new sparse weight vector with exactly `k` positive entries.
///
/// Magnitudes come from Dirichlet(1, …, 1); positions are `k` distinct
/// indices drawn uniformly from `0..n_hist`. Magnitudes are assigned in draw
/// order.
///
/// # Errors
///
/// [`SamplerError::InvalidConfiguration`] when `n_hist == 0` or `k` is
/// outside `[1, n_hist]`.
pub fn fresh<R: Rng + ?Sized>(n_hist: usize, k: usize, rng: &mut R) -> Result<WeightVector> {
    validate_n_hist(n_hist)?;
    validate_k(k, Some(n_hist))?;

    let magnitudes = flat_dirichlet(k, rng)?;
    let positions = index::sample(rng, n_hist, k);

    let mut values = vec![0.0; n_hist];
    for (pos, magnitude) in positions.iter().zip(magnitudes) {
        values[pos] = magnitude;
    }
    Ok(WeightVector::from(values))
}

/// Uniform draw from the `k - 1` simplex.
fn flat_dirichlet<R: Rng + ?Sized>(k: usize, rng: &mut R) -> Result<Vec<f64>> {
    // Dirichlet needs at least two components; the 0-simplex is a single point.
    if k == 1 {
        return Ok(vec![1.0]);
    }
    let alpha = vec![1.0_f64; k];
    let dirichlet = Dirichlet::new(&alpha)
        .map_err(|e| SamplerError::InvalidConfiguration(format!("dirichlet: {e}")))?;
    Ok(dirichlet.sample(rng))
}

// ─── Perturbation mutator ───────────────────────────────────────────────────

/// Perturb a weight vector while keeping its active count, sign and mass.
///
/// 1. Take the support (strictly positive positions) and renormalize it.
/// 2. Add `N(0, std)` noise to each support magnitude.
/// 3. Non-negative results stay in place. Negative results vacate their
///    slot and keep their magnitude (sign flipped).
/// 4. Each displaced magnitude moves to a distinct position drawn uniformly
///    from every zero slot left after step 3, in extraction order.
/// 5. Renormalize.
///
/// Non-positive entries of the input are not carried over; the returned
/// vector is built fresh and the input is left untouched.
///
/// # Errors
///
/// - [`SamplerError::InvalidConfiguration`] — `std` not finite and positive,
///   non-finite input, or an input with no positive mass.
/// - [`SamplerError::InsufficientCapacity`] — fewer zero slots than displaced
///   magnitudes. Cannot happen for a well-formed input since every vacated
///   slot is itself eligible.
/// - [`SamplerError::Degenerate`] — the noise overflowed to `inf`, or an
///   active entry underflowed to zero, so the result cannot hold `k` positive
///   entries summing to 1.
pub fn mutate<R: Rng + ?Sized>(
    weights: &WeightVector,
    std: f64,
    rng: &mut R,
) -> Result<WeightVector> {
    validate_std(std)?;
    if !weights.is_finite() {
        return Err(SamplerError::InvalidConfiguration(
            "prior weights must be finite".into(),
        ));
    }

    let prior = weights.as_slice();
    let support = weights.support();
    if support.is_empty() {
        return Err(SamplerError::InvalidConfiguration(
            "cannot mutate a weight vector with no positive mass".into(),
        ));
    }
    let mut magnitudes: Vec<f64> = support.iter().map(|&i| prior[i]).collect();
    normalize_in_place(&mut magnitudes)?;

    let noise = Normal::new(0.0, std)
        .map_err(|e| SamplerError::InvalidConfiguration(format!("normal: {e}")))?;

    let mut values = vec![0.0; prior.len()];
    let mut displaced = Vec::new();
    for (&i, &magnitude) in support.iter().zip(&magnitudes) {
        let perturbed = magnitude + noise.sample(rng);
        if perturbed >= 0.0 {
            values[i] = perturbed;
        } else {
            displaced.push(-perturbed);
        }
    }

    if !displaced.is_empty() {
        let free: Vec<usize> = values
            .iter()
            .enumerate()
            .filter(|(_, &w)| w == 0.0)
            .map(|(i, _)| i)
            .collect();
        if free.len() < displaced.len() {
            return Err(SamplerError::InsufficientCapacity {
                needed: displaced.len(),
                available: free.len(),
            });
        }
        trace!(
            displaced = displaced.len(),
            free = free.len(),
            "redistributing displaced mass"
        );
        let picks = index::sample(rng, free.len(), displaced.len());
        for (slot, magnitude) in picks.iter().zip(displaced) {
            values[free[slot]] = magnitude;
        }
    }

    let mut out = WeightVector::from(values);
    out.normalize()?;
    if out.support_count() != support.len() {
        return Err(SamplerError::Degenerate(format!(
            "{} of {} active entries survived renormalization",
            out.support_count(),
            support.len()
        )));
    }
    Ok(out)
}

// ─── Sampler ────────────────────────────────────────────────────────────────

/// A [`SamplerConfig`] bundled with an owned random generator.
///
/// Convenient for a single explorer session: seed it once and call
/// [`Sampler::step`] with the previous output each time. One `Sampler` is
/// not meant to be shared across threads without the caller's own lock; give
/// each worker its own instance instead.
#[derive(Debug)]
pub struct Sampler<R> {
    config: SamplerConfig,
    rng: R,
}

impl<R: Rng> Sampler<R> {
    /// Wrap `rng` with a validated `config`.
    ///
    /// The `n_dim_to_keep <= n_hist` bound is checked per step, since `n_hist`
    /// is only known when the embedding store is consulted.
    pub fn new(config: SamplerConfig, rng: R) -> Result<Self> {
        config.validate_params()?;
        Ok(Self { config, rng })
    }

    /// Active configuration.
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Run the dispatcher once with the stored configuration.
    pub fn step(&mut self, n_hist: usize, prior: Option<&WeightVector>) -> Result<WeightVector> {
        sample(
            n_hist,
            prior,
            self.config.n_dim_to_keep,
            self.config.std,
            &mut self.rng,
        )
    }

    /// Take `steps` consecutive steps starting from no prior.
    ///
    /// The first vector is fresh; every later one perturbs its predecessor.
    pub fn walk(&mut self, n_hist: usize, steps: usize) -> Result<Vec<WeightVector>> {
        let mut path: Vec<WeightVector> = Vec::with_capacity(steps);
        for _ in 0..steps {
            let next = self.step(n_hist, path.last())?;
            path.push(next);
        }
        Ok(path)
    }
}

impl Sampler<StdRng> {
    /// Reproducible sampler seeded from `seed`.
    pub fn seeded(config: SamplerConfig, seed: u64) -> Result<Self> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    /// Sampler seeded from operating-system entropy.
    pub fn from_entropy(config: SamplerConfig) -> Result<Self> {
        Self::new(config, StdRng::from_entropy())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
