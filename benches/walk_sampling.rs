//! Benchmarks for walk samplers.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;

use kgwalk::graph::TripleIndex;
use kgwalk::walk::{IndexWalker, WalkMode, WalkSampler, WalkSettings};

/// Layered graph: every node in layer `l` links to `fan_out` nodes of layer `l + 1`.
fn layered_graph(layers: usize, width: usize, fan_out: usize) -> TripleIndex {
    let mut index = TripleIndex::new();
    for layer in 0..layers {
        for i in 0..width {
            for k in 0..fan_out {
                let target = (i * 31 + k * 7) % width;
                index.add_edge(
                    &format!("n{layer}_{i}"),
                    &format!("p{k}"),
                    &format!("n{}_{target}", layer + 1),
                );
            }
        }
    }
    index
}

fn bench_modes(c: &mut Criterion) {
    let index = layered_graph(6, 200, 5);
    let start = index.symbol("n2_17").unwrap();
    let settings = WalkSettings {
        depth: 4,
        walks_per_entity: 100,
        ..Default::default()
    };

    for mode in WalkMode::ALL {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        c.bench_function(&format!("walks_{}", mode.as_str().to_lowercase()), |bench| {
            bench.iter(|| {
                black_box(IndexWalker.walks(&index, mode, start, &settings, &mut rng))
            })
        });
    }
}

criterion_group!(benches, bench_modes);
criterion_main!(benches);
