//! Paint channel benchmarks.
//!
//! The CMP is computed once per lattice; each iteration composites over the
//! same channels again, which costs the same as the first pass.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use coalesce_benches::{error::BenchSetupError, params::LatticeBenchParams};
use coalesce_core::{ClusterFilter, ClusterId, Cmp, ColourScale, Rgba, TorusLattice};

/// Seed used for every generated lattice.
const SEED: u64 = 42;

/// Lattice sides to benchmark.
const SIDES: &[usize] = &[64, 128];

/// Bernoulli parameter of the radii.
const PROBABILITY: f64 = 0.12;

fn compound_clusters(cmp: &Cmp<(usize, usize)>) -> Vec<ClusterId> {
    let filter = ClusterFilter::ALL.skip_trivial().skip_isolated();
    cmp.clusters_up(filter).map(|cluster| cluster.id()).collect()
}

fn paint_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("paint");
    group.sample_size(20);

    for &side in SIDES {
        let params = LatticeBenchParams {
            side,
            probability: PROBABILITY,
        };
        let torus = TorusLattice::bernoulli(side, side, PROBABILITY, SEED)?;
        let mut cmp = Cmp::compute(&torus, (0, 0))?;
        let clusters = compound_clusters(&cmp);

        group.bench_function(BenchmarkId::new("clusters_by_height", &params), |b| {
            b.iter(|| -> Result<(), BenchSetupError> {
                for &id in &clusters {
                    let colour = cmp.colour_for(id, ColourScale::Height)?;
                    cmp.paint_cluster(id, colour, 0)?;
                }
                Ok(())
            });
        });

        let largest = cmp.largest().id();
        group.bench_function(BenchmarkId::new("largest_stabiliser", &params), |b| {
            b.iter(|| cmp.paint_stabiliser(largest, Rgba::opaque(255, 0, 0), true, 0));
        });

        group.bench_function(BenchmarkId::new("graph", &params), |b| {
            b.iter(|| cmp.paint_graph(Rgba::new(0, 0, 64, 64), 0));
        });
    }

    group.finish();
    Ok(())
}

fn paint(c: &mut Criterion) {
    if let Err(err) = paint_impl(c) {
        panic!("paint benchmark setup failed: {err}");
    }
}

criterion_group!(benches, paint);
criterion_main!(benches);
