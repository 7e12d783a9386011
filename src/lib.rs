//! # stylewalk-core
//!
//! Sparse weight-vector sampling for iterative exploration of a style space.
//!
//! ---
//!
//! ## What it does
//!
//! A fixed collection of historical reference embeddings spans a style
//! space. A point in that space is a **weight vector**: one non-negative
//! weight per historical embedding, exactly `k` of them non-zero, summing to
//! 1. Its linear combination with the embeddings is the style vector handed
//! to image generation.
//!
//! Each exploration step either:
//!
//! - **draws fresh** — a Dirichlet-uniform point on `k` random positions, when
//!   there is no previous vector or its cardinality is wrong; or
//! - **perturbs** — adds Gaussian noise to the previous vector's active
//!   entries and moves any mass that went negative onto random empty
//!   positions, so the step stays sparse, non-negative and normalized.
//!
//! ## The pipeline
//!
//! ```text
//! prior weights? ──► sampler::sample ──► WeightVector ──► EmbeddingMatrix::style_vector ──► style
//!                        │
//!                 route: Fresh | Perturb
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`sampler`] | [`sample`], [`Sampler`], [`Route`] | Dispatcher, fresh sampler, perturbation mutator |
//! | [`weights`] | [`WeightVector`] | Row vector with support / normalization checks |
//! | [`config`] | [`SamplerConfig`] | Sparsity target and perturbation scale |
//! | [`style`] | [`EmbeddingMatrix`] | Historical embeddings and linear combination |
//! | [`error`] | [`SamplerError`] | Error taxonomy |
//! | [`record`] | [`record::StyleRequest`] | Serializable request/response records (requires `serde` feature) |
//!
//! ## Randomness
//!
//! Every sampling function takes `&mut R where R: Rng + ?Sized`. Pin a seed
//! for reproducible replay, or use [`sampler::sample_with_thread_rng`] for
//! independent per-thread streams under concurrent load.
//!
//! ## Features
//!
//! - `serde` — `Serialize`/`Deserialize` for [`WeightVector`] and
//!   [`SamplerConfig`], plus the [`record`] module.
//! - `python-ffi` — PyO3 bindings (build with `maturin develop --features python-ffi`).
//!
//! ## Logging
//!
//! Routing decisions are emitted as `tracing` events at `debug` level and
//! redistribution details at `trace` level. The crate never installs a
//! subscriber.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod error;
pub mod sampler;
pub mod style;
pub mod weights;
#[cfg(feature = "serde")]
pub mod record;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use config::SamplerConfig;
pub use error::{Result, SamplerError};
pub use sampler::{fresh, mutate, route, sample, Route, Sampler};
pub use style::EmbeddingMatrix;
pub use weights::WeightVector;
