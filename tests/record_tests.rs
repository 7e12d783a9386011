//! Request/response record integration tests.
//!
//! Verifies that a JSON request from the HTTP layer drives one exploration
//! step end to end, and that a response can be fed back as the next request.
//!
//! Run with: `cargo test --features serde`

#[cfg(feature = "serde")]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use stylewalk_core::record::{InferenceParameters, StyleRequest, StyleResponse};
    use stylewalk_core::{EmbeddingMatrix, SamplerConfig, SamplerError, WeightVector};

    // ── Helpers ──────────────────────────────────────────────────────────────

    /// Twelve 4-dimensional embeddings with distinct rows.
    fn embeddings() -> EmbeddingMatrix {
        let rows = (0..12)
            .map(|i| {
                let x = i as f32;
                vec![x, 1.0, -x, 0.5 * x]
            })
            .collect();
        EmbeddingMatrix::from_rows(rows).unwrap()
    }

    fn config() -> SamplerConfig {
        SamplerConfig {
            n_dim_to_keep: 3,
            std: 0.05,
        }
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_request_without_weights_parses() {
        let req: StyleRequest = serde_json::from_str(
            r#"{"request_id":"abc","weights":null,"prompt":"a painting of a dog"}"#,
        )
        .unwrap();
        assert_eq!(req.request_id, "abc");
        assert!(req.weights.is_none());
        assert!(req.n_dim_to_keep.is_none());
        assert!(req.std.is_none());
    }

    #[test]
    fn test_weights_serialize_as_plain_array() {
        let w = WeightVector::from(vec![0.0, 0.25, 0.75]);
        assert_eq!(serde_json::to_string(&w).unwrap(), "[0.0,0.25,0.75]");
    }

    #[test]
    fn test_first_request_returns_fresh_weights_and_style() {
        let m = embeddings();
        let req = StyleRequest {
            request_id: "first".into(),
            weights: None,
            prompt: "a painting of a dog".into(),
            seed: None,
            n_dim_to_keep: None,
            std: None,
        };
        let resp = req
            .respond(&m, &config(), &mut ChaCha8Rng::seed_from_u64(1))
            .unwrap();

        assert_eq!(resp.request_id, "first");
        assert_eq!(resp.weights.len(), m.n_hist());
        assert!(resp.weights.is_stable(3));
        assert_eq!(resp.style_vector.len(), m.dim());
        assert_eq!(resp.style_vector, m.style_vector(&resp.weights).unwrap());
    }

    #[test]
    fn test_follow_up_request_mutates_previous_weights() {
        let m = embeddings();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let req = StyleRequest {
            request_id: "walk".into(),
            weights: None,
            prompt: "a painting of a cat".into(),
            seed: None,
            n_dim_to_keep: None,
            std: None,
        };
        let first = req.respond(&m, &config(), &mut rng).unwrap();

        // Round-trip through JSON as the HTTP layer would.
        let json = serde_json::to_string(&first.follow_up()).unwrap();
        let next_req: StyleRequest = serde_json::from_str(&json).unwrap();
        let second = next_req.respond(&m, &config(), &mut rng).unwrap();

        assert!(second.weights.is_stable(3));
        assert_ne!(second.weights, first.weights);
        assert_eq!(second.prompt, first.prompt);
    }

    #[test]
    fn test_request_overrides_apply() {
        let m = embeddings();
        let req: StyleRequest = serde_json::from_str(
            r#"{"request_id":"o","weights":null,"prompt":"p","n_dim_to_keep":5,"std":0.2}"#,
        )
        .unwrap();
        let resp = req
            .respond(&m, &config(), &mut ChaCha8Rng::seed_from_u64(3))
            .unwrap();
        assert!(resp.weights.is_stable(5));
    }

    #[test]
    fn test_wrong_length_weights_are_rejected() {
        let m = embeddings();
        let req = StyleRequest {
            request_id: "bad".into(),
            weights: Some(WeightVector::from(vec![0.5, 0.5])),
            prompt: "p".into(),
            seed: None,
            n_dim_to_keep: None,
            std: None,
        };
        assert_eq!(
            req.respond(&m, &config(), &mut ChaCha8Rng::seed_from_u64(4)),
            Err(SamplerError::ShapeMismatch {
                expected: 12,
                actual: 2
            })
        );
    }

    #[test]
    fn test_response_round_trips() {
        let m = embeddings();
        let req = StyleRequest {
            request_id: "rt".into(),
            weights: None,
            prompt: "p".into(),
            seed: None,
            n_dim_to_keep: None,
            std: None,
        };
        let resp = req
            .respond(&m, &config(), &mut ChaCha8Rng::seed_from_u64(5))
            .unwrap();
        let json = serde_json::to_string(&resp).unwrap();
        let back: StyleResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back.request_id, resp.request_id);
        assert_eq!(back.weights.support(), resp.weights.support());
        for (a, b) in back.weights.iter().zip(resp.weights.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
        for (a, b) in back.style_vector.iter().zip(&resp.style_vector) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    /// A seeded request yields the same weights whatever RNG the caller passes.
    #[test]
    fn test_seeded_request_is_reproducible() {
        let m = embeddings();
        let req: StyleRequest = serde_json::from_str(
            r#"{"request_id":"s","weights":null,"prompt":"p","seed":1234}"#,
        )
        .unwrap();
        assert_eq!(req.seed, Some(1234));

        let a = req
            .respond(&m, &config(), &mut ChaCha8Rng::seed_from_u64(10))
            .unwrap();
        let b = req
            .respond(&m, &config(), &mut ChaCha8Rng::seed_from_u64(11))
            .unwrap();
        assert_eq!(a.weights, b.weights);
        assert!(a.weights.is_stable(3));

        let mut follow = a.follow_up();
        follow.seed = Some(99);
        let c = follow
            .respond(&m, &config(), &mut ChaCha8Rng::seed_from_u64(12))
            .unwrap();
        let d = follow
            .respond(&m, &config(), &mut ChaCha8Rng::seed_from_u64(13))
            .unwrap();
        assert_eq!(c.weights, d.weights);
        assert_ne!(c.weights, a.weights);
    }

    /// Without a seed the caller's RNG drives the draw.
    #[test]
    fn test_unseeded_request_follows_caller_rng() {
        let m = embeddings();
        let req: StyleRequest =
            serde_json::from_str(r#"{"request_id":"u","weights":null,"prompt":"p"}"#).unwrap();
        assert!(req.seed.is_none());
        let a = req
            .respond(&m, &config(), &mut ChaCha8Rng::seed_from_u64(20))
            .unwrap();
        let b = req
            .respond(&m, &config(), &mut ChaCha8Rng::seed_from_u64(21))
            .unwrap();
        assert_ne!(a.weights, b.weights);
    }

    /// The content key is a stable 64-character hex digest that changes with
    /// the style, the prompt, or the inference parameters.
    #[test]
    fn test_content_key_tracks_inputs() {
        let m = embeddings();
        let req = StyleRequest {
            request_id: "k".into(),
            weights: None,
            prompt: "a lighthouse".into(),
            seed: Some(7),
            n_dim_to_keep: None,
            std: None,
        };
        let resp = req
            .respond(&m, &config(), &mut ChaCha8Rng::seed_from_u64(0))
            .unwrap();
        let params = InferenceParameters::default();

        let key = resp.content_key(&params).unwrap();
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(key, resp.content_key(&params).unwrap());

        let again = req
            .respond(&m, &config(), &mut ChaCha8Rng::seed_from_u64(1))
            .unwrap();
        assert_eq!(again.content_key(&params).unwrap(), key);

        let mut other_prompt = resp.clone();
        other_prompt.prompt = "a lighthouse at night".into();
        assert_ne!(other_prompt.content_key(&params).unwrap(), key);

        let more_steps = InferenceParameters {
            inference_steps: 30,
            ..InferenceParameters::default()
        };
        assert_ne!(resp.content_key(&more_steps).unwrap(), key);

        let next = resp
            .follow_up()
            .respond(&m, &config(), &mut ChaCha8Rng::seed_from_u64(2))
            .unwrap();
        assert_ne!(next.content_key(&params).unwrap(), key);
    }

    #[test]
    fn test_config_round_trips() {
        let json = serde_json::to_string(&config()).unwrap();
        let back: SamplerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config());
    }
}
