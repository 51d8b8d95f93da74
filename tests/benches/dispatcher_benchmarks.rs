//! # Inscription-Ledger Benchmarks
//!
//! | Target | What is measured |
//! |--------|------------------|
//! | ix-01 Dispatcher | one verdict per operation kind |
//! | ix-01 AMM math | swap quote at the numeric ceiling |
//! | ix-03 Pipeline | batch throughput, sequential vs parallel lanes |

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ix_01_validation::{quote_swap, Dispatcher, ValidationApi, ValidatorConfig};
use ix_02_ledger_state::InMemoryLedger;
use ix_03_sequencing::{IngestionApi, IngestionPipeline, SequencerConfig};
use ix_tests::fixtures::ChainBuilder;
use shared_types::{PoolKey, PoolState, Ticker, TokenAmount, U256};

fn amt(v: u64) -> TokenAmount {
    TokenAmount::from(v)
}

/// Ledger with FOO deployed, a funded DOGE/FOO pool and one rich trader.
fn seeded_ledger() -> InMemoryLedger {
    let key = PoolKey::new(Ticker::new("DOGE"), Ticker::new("FOO"));
    InMemoryLedger::new()
        .with_token("FOO", amt(1_000_000_000), amt(1_000), amt(0))
        .with_token("DOGE", amt(1_000_000_000), amt(1_000), amt(0))
        .with_pool(
            PoolState::empty(key)
                .with_reserves(amt(1_000_000), amt(2_000_000))
                .with_liquidity(amt(1_414_213)),
        )
        .with_balance("DOGE", "DTrader", amt(1_000_000))
        .with_balance("FOO", "DTrader", amt(1_000_000))
}

// ============================================================================
// IX-01: Dispatcher
// ============================================================================

fn bench_dispatcher_verdicts(c: &mut Criterion) {
    let mut group = c.benchmark_group("ix-01-dispatcher");
    let dispatcher = Dispatcher::new(Arc::new(seeded_ledger()), ValidatorConfig::default());

    let mut chain = ChainBuilder::new();
    chain
        .deploy("DTrader", "BAR", 1_000, 10)
        .mint("DTrader", "FOO", 1_000)
        .transfer("DTrader", "FOO", 10, "DA,DB,DC,DD")
        .add("DTrader", "DOGE", "FOO", 1_000, 2_500)
        .swap("DTrader", "DOGE", "FOO", 10_000, 19_000)
        .deposit("DTrader", 5);

    for envelope in chain.envelopes() {
        let name = envelope.inscription.op();
        group.bench_function(name, |b| {
            b.iter(|| black_box(dispatcher.validate_envelope(black_box(&envelope))))
        });
    }
    group.finish();
}

fn bench_swap_quote(c: &mut Criterion) {
    let mut group = c.benchmark_group("ix-01-amm");
    let huge = U256::MAX / 3;

    group.bench_function("quote_small", |b| {
        b.iter(|| quote_swap(black_box(amt(10_000)), amt(1_000_000), amt(2_000_000)))
    });
    group.bench_function("quote_near_ceiling", |b| {
        b.iter(|| quote_swap(black_box(huge), huge, huge))
    });
    group.finish();
}

// ============================================================================
// IX-03: Pipeline
// ============================================================================

fn workload(tickers: usize, per_ticker: usize) -> ChainBuilder {
    let names: Vec<String> = (0..tickers).map(|i| format!("T{i:03}")).collect();
    let mut chain = ChainBuilder::new();
    for name in &names {
        chain.deploy("DDeployer", name, 1_000_000_000, 1_000);
    }
    for round in 0..per_ticker {
        chain.next_block();
        for name in &names {
            if round % 2 == 0 {
                chain.mint("DAlice", name, 1_000);
            } else {
                chain.transfer("DAlice", name, 100, "DBob,DCarol");
            }
        }
    }
    chain
}

fn bench_pipeline_lanes(c: &mut Criterion) {
    let mut group = c.benchmark_group("ix-03-pipeline");
    group.measurement_time(Duration::from_secs(10));

    for tickers in [1, 8, 64] {
        let chain = workload(tickers, 32);
        let batch = chain.envelopes();
        group.throughput(Throughput::Elements(batch.len() as u64));

        for parallel_lanes in [false, true] {
            let label = if parallel_lanes { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(label, tickers), &batch, |b, batch| {
                b.iter(|| {
                    let pipeline = IngestionPipeline::new(
                        Arc::new(InMemoryLedger::new()),
                        ValidatorConfig::default(),
                        SequencerConfig {
                            parallel_lanes,
                            ..SequencerConfig::default()
                        },
                    );
                    black_box(pipeline.process_batch(batch.clone()))
                })
            });
        }
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_dispatcher_verdicts,
    bench_swap_quote,
    bench_pipeline_lanes
);
criterion_main!(benches);
