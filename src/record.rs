//! Serializable request and response records for a style-exploration service.
//!
//! These mirror the JSON contract of the HTTP layer that sits in front of the
//! sampler: a request optionally carries the previous weights, and the
//! response returns the new weights together with the combined style vector.
//!
//! ```text
//! StyleRequest { request_id, weights?, prompt, seed?, n_dim_to_keep?, std? }
//!        │
//!        ▼  sample (n_hist = embeddings.n_hist())  →  style_vector
//! StyleResponse { request_id, prompt, weights, style_vector }
//!        │
//!        ▼  content_key(InferenceParameters)  →  sha256 hex
//! ```
//!
//! Image generation and storage of the generated image are handled by other
//! collaborators and are not represented here. They address stored images by
//! [`StyleResponse::content_key`].
//!
//! This module requires the `serde` feature.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

use crate::config::SamplerConfig;
use crate::error::{Result, SamplerError};
use crate::sampler::sample;
use crate::style::EmbeddingMatrix;
use crate::weights::WeightVector;

/// One exploration request.
///
/// # Example
///
/// ```rust,ignore
/// use stylewalk_core::record::StyleRequest;
///
/// let req: StyleRequest = serde_json::from_str(
///     r#"{"request_id":"a1","weights":null,"prompt":"a harbour at dusk"}"#,
/// ).unwrap();
/// let resp = req.respond(&embeddings, &SamplerConfig::default(), &mut rand::thread_rng())?;
/// ```
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct StyleRequest {
    /// Caller-chosen identifier, echoed in the response.
    pub request_id: String,
    /// Previous weights, or `None` to start a new exploration.
    #[serde(default)]
    pub weights: Option<WeightVector>,
    /// Text prompt forwarded to image generation.
    pub prompt: String,
    /// Seeds the sampler for this step; `None` draws from the caller's RNG.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Overrides [`SamplerConfig::n_dim_to_keep`] when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_dim_to_keep: Option<usize>,
    /// Overrides [`SamplerConfig::std`] when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std: Option<f64>,
}

/// Result of one exploration step.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct StyleResponse {
    /// Identifier copied from the request.
    pub request_id: String,
    /// Prompt copied from the request.
    pub prompt: String,
    /// New weights over the historical collection.
    pub weights: WeightVector,
    /// `weights · embeddings`, length = embedding dimension.
    pub style_vector: Vec<f64>,
}

/// Parameters forwarded to the image generator alongside the style vector.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct InferenceParameters {
    /// Classifier-free guidance scale. Default: 7.0
    pub guidance_scale: f64,
    /// Denoising steps. Default: 50
    pub inference_steps: u32,
    /// Images generated per request. Default: 1
    pub num_images: u32,
    /// Generator seed. Default: 42
    pub seed: u64,
}

impl Default for InferenceParameters {
    fn default() -> Self {
        Self {
            guidance_scale: 7.0,
            inference_steps: 50,
            num_images: 1,
            seed: 42,
        }
    }
}

impl StyleRequest {
    /// Effective configuration: request overrides on top of `defaults`.
    pub fn config(&self, defaults: &SamplerConfig) -> SamplerConfig {
        SamplerConfig {
            n_dim_to_keep: self.n_dim_to_keep.unwrap_or(defaults.n_dim_to_keep),
            std: self.std.unwrap_or(defaults.std),
        }
    }

    /// Sample the next weights against `embeddings` and combine them.
    ///
    /// When [`seed`](Self::seed) is set the step draws from a fresh
    /// `StdRng` seeded with it and `rng` is left untouched, so the same
    /// request always produces the same weights.
    ///
    /// Errors from the sampler or the combination are returned unchanged;
    /// the transport layer decides how to present them.
    pub fn respond<R: Rng + ?Sized>(
        &self,
        embeddings: &EmbeddingMatrix,
        defaults: &SamplerConfig,
        rng: &mut R,
    ) -> Result<StyleResponse> {
        let config = self.config(defaults);
        let n_hist = embeddings.n_hist();
        let prior = self.weights.as_ref();
        let (k, std) = (config.n_dim_to_keep, config.std);
        let weights = match self.seed {
            Some(seed) => sample(n_hist, prior, k, std, &mut StdRng::seed_from_u64(seed))?,
            None => sample(n_hist, prior, k, std, rng)?,
        };
        let style_vector = embeddings.style_vector(&weights)?;
        Ok(StyleResponse {
            request_id: self.request_id.clone(),
            prompt: self.prompt.clone(),
            weights,
            style_vector,
        })
    }
}

impl StyleResponse {
    /// Build the follow-up request that continues from this response.
    pub fn follow_up(&self) -> StyleRequest {
        StyleRequest {
            request_id: self.request_id.clone(),
            weights: Some(self.weights.clone()),
            prompt: self.prompt.clone(),
            seed: None,
            n_dim_to_keep: None,
            std: None,
        }
    }

    /// Content address of the image this response would generate.
    ///
    /// SHA-256 over the compact JSON of the style vector, then the prompt's
    /// UTF-8 bytes, then the compact JSON of `params`, as lowercase hex.
    /// Identical inputs always map to the same key, so a stored image can be
    /// looked up before generating it again.
    ///
    /// # Errors
    ///
    /// - [`SamplerError::Encoding`] if either value fails to serialize.
    pub fn content_key(&self, params: &InferenceParameters) -> Result<String> {
        let style = serde_json::to_vec(&self.style_vector)
            .map_err(|e| SamplerError::Encoding(e.to_string()))?;
        let params =
            serde_json::to_vec(params).map_err(|e| SamplerError::Encoding(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(&style);
        hasher.update(self.prompt.as_bytes());
        hasher.update(&params);
        Ok(hex::encode(hasher.finalize()))
    }
}
