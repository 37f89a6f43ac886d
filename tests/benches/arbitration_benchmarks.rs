//! # Arbitration Benchmarks
//!
//! | Engine | Operation | Target |
//! |--------|-----------|--------|
//! | ar-01 | weighted-majority over 1k opinions | < 1ms |
//! | ar-01 | delphi (3 rounds) over 1k opinions | < 5ms |
//! | ar-02 | mediation to exhaustion, 100 positions | < 5ms |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use std::time::Duration;

use ar_01_consensus::domain::{run_strategy as run_consensus, WeightContext};
use ar_01_consensus::{ConsensusConfig, ConsensusMethod, ConsensusRequest, Opinion};
use ar_02_conflict_resolution::domain::{run_strategy as run_resolution, ResolutionContext};
use ar_02_conflict_resolution::{Conflict, ConflictKind, Position, ResolutionMethod, ResolverConfig};

const LABELS: [&str; 4] = ["strict", "loose", "off", "custom"];

fn random_request(size: usize) -> ConsensusRequest {
    let mut rng = rand::thread_rng();
    let opinions = (0..size)
        .map(|i| {
            Opinion::new(
                format!("p{i}"),
                LABELS[rng.gen_range(0..LABELS.len())],
                rng.gen_range(0.1..1.0),
            )
        })
        .collect();
    ConsensusRequest::new("bench", opinions)
}

fn random_conflict(size: usize) -> Conflict {
    let mut rng = rand::thread_rng();
    let positions = (0..size)
        .map(|i| {
            Position::new(
                format!("p{i}"),
                LABELS[rng.gen_range(0..LABELS.len())],
                rng.gen_range(0.1..1.0),
            )
            .with_flexibility(rng.gen_range(0.0..0.4))
        })
        .collect();
    Conflict::new("bench", ConflictKind::Scope, positions)
}

// ============================================================================
// AR-01: Consensus strategies
// ============================================================================

fn bench_consensus_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("ar-01-consensus");
    group.measurement_time(Duration::from_secs(5));

    let ctx = WeightContext::default();
    let config = ConsensusConfig::default();

    for size in [10, 100, 1000] {
        let request = random_request(size);
        group.throughput(Throughput::Elements(size as u64));

        for method in [
            ConsensusMethod::WeightedMajority,
            ConsensusMethod::ByzantineFaultTolerant,
            ConsensusMethod::DelphiMethod,
        ] {
            group.bench_with_input(
                BenchmarkId::new(method.as_str(), size),
                &request,
                |b, request| {
                    b.iter(|| black_box(run_consensus(method, request, &ctx, &config).is_ok()))
                },
            );
        }
    }

    group.finish();
}

// ============================================================================
// AR-02: Conflict resolution
// ============================================================================

fn bench_conflict_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("ar-02-conflict-resolution");
    group.measurement_time(Duration::from_secs(5));

    let config = ResolverConfig::default();
    let ctx = ResolutionContext::new(&config);

    for size in [10, 100] {
        let conflict = random_conflict(size);
        group.throughput(Throughput::Elements(size as u64));

        for method in [
            ResolutionMethod::Mediation,
            ResolutionMethod::Voting,
            ResolutionMethod::Arbitration,
        ] {
            group.bench_with_input(
                BenchmarkId::new(method.as_str(), size),
                &conflict,
                |b, conflict| b.iter(|| black_box(run_resolution(method, conflict, &ctx).is_ok())),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_consensus_strategies, bench_conflict_resolution);
criterion_main!(benches);
