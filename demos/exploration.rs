//! # Style-space exploration walk
//!
//! Builds a small synthetic embedding collection, then takes a sequence of
//! exploration steps: one fresh draw followed by perturbations. Prints the
//! active positions, their weights and how far the style vector moved.
//!
//! Run with: `RUST_LOG=stylewalk_core=trace cargo run --example exploration`

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

use stylewalk_core::{EmbeddingMatrix, Sampler, SamplerConfig, WeightVector};

const N_HIST: usize = 24;
const DIM: usize = 8;
const STEPS: usize = 12;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn synthetic_embeddings(rng: &mut ChaCha8Rng) -> EmbeddingMatrix {
    let data: Vec<f32> = (0..N_HIST * DIM).map(|_| rng.gen_range(-1.0..1.0)).collect();
    EmbeddingMatrix::from_flat(data, DIM).expect("synthetic matrix is rectangular")
}

fn bar(v: f64) -> String {
    let filled = (v * 20.0).round() as usize;
    format!("{}{}", "█".repeat(filled.min(20)), "░".repeat(20 - filled.min(20)))
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum::<f64>().sqrt()
}

fn row(step: usize, w: &WeightVector, moved: Option<f64>) {
    let support = w.support();
    let cells: Vec<String> = support
        .iter()
        .map(|&i| format!("{i:>2}:{:.3}", w.as_slice()[i]))
        .collect();
    let moved = moved.map_or_else(|| "  fresh".to_string(), |d| format!("Δ {d:.4}"));
    println!("  step {step:>2} | {moved} | {}", cells.join("  "));
}

// ── Main ─────────────────────────────────────────────────────────────────────

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("╔══════════════════════════════════════════════════════════════════════╗");
    println!("║  Style-space exploration — {N_HIST} historical embeddings, {STEPS} steps          ║");
    println!("╚══════════════════════════════════════════════════════════════════════╝\n");

    let mut data_rng = ChaCha8Rng::seed_from_u64(7);
    let embeddings = synthetic_embeddings(&mut data_rng);

    let config = SamplerConfig {
        n_dim_to_keep: 4,
        std: 0.05,
    };
    let mut sampler = Sampler::seeded(config, 42).expect("valid config");

    let path = sampler
        .walk(embeddings.n_hist(), STEPS)
        .expect("walk stays within the collection");

    let mut prev_style: Option<Vec<f64>> = None;
    for (step, w) in path.iter().enumerate() {
        let style = embeddings.style_vector(w).expect("weights match collection");
        let moved = prev_style.as_ref().map(|p| distance(p, &style));
        row(step, w, moved);
        prev_style = Some(style);
    }

    let last = path.last().expect("at least one step");
    println!("\n▶  Final weights\n");
    for i in last.support() {
        let v = last.as_slice()[i];
        println!("  artist {i:>2}  {}  {v:.3}", bar(v));
    }

    // A prior with the wrong cardinality is discarded for a fresh draw.
    println!("\n▶  Changing the sparsity target resets the walk\n");
    let mut wider = Sampler::seeded(
        SamplerConfig {
            n_dim_to_keep: 6,
            ..sampler.config().clone()
        },
        43,
    )
    .expect("valid config");
    let reset = wider
        .step(embeddings.n_hist(), Some(last))
        .expect("fresh draw succeeds");
    row(0, &reset, None);
}
