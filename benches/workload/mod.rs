//! Seeded hyperedge workloads shared by the benchmarks.

#![allow(dead_code)]

use hyperforest::{Hyperedge, VertexId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const SEED: u64 = 42;

/// Draws `count` hyperedges of 2 to 8 vertices from a universe of `universe`
/// vertices. Heavy-tailed weights follow a Pareto law with shape 1.5.
pub fn hyperedges(count: usize, universe: VertexId, power_law: bool) -> Vec<Hyperedge> {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    (0..count)
        .map(|_| {
            let len = rng.gen_range(2..=8);
            let vertices: Vec<VertexId> = (0..len).map(|_| rng.gen_range(0..universe)).collect();
            let weight = if power_law {
                let u: f64 = rng.gen_range(f64::EPSILON..1.0);
                u.powf(-1.0 / 1.5)
            } else {
                rng.gen_range(0.0..100.0)
            };
            Hyperedge::new(&vertices, weight)
        })
        .collect()
}

/// Random query vertex lists of 1 to 3 vertices.
pub fn queries(count: usize, universe: VertexId) -> Vec<Vec<VertexId>> {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED + 1);
    (0..count)
        .map(|_| {
            let len = rng.gen_range(1..=3);
            (0..len).map(|_| rng.gen_range(0..universe)).collect()
        })
        .collect()
}
