//! # Cross-Crate Flows
//!
//! Validation (1), ledger state (2) and sequencing (3) driven together,
//! either through `IngestionPipeline` or through the runtime's JSONL reader.
//!
//! ## Flows Tested
//!
//! 1. **Pool lifecycle**: create → add → remove → swap on one pair
//! 2. **Slippage**: bounded swaps and adds that the pool cannot satisfy
//! 3. **Bridge**: deposit/withdraw with and without balance enforcement
//! 4. **Runtime parity**: JSONL input reaches the same ledger as direct calls
//! 5. **Determinism**: random workloads, parallel vs sequential lanes

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use indexer_runtime::{IndexerRuntime, RuntimeConfig};
    use ix_01_validation::{quote_swap, LedgerQuery, RejectReason, ValidatorConfig};
    use ix_02_ledger_state::InMemoryLedger;
    use ix_03_sequencing::{BatchReport, IngestionApi, IngestionPipeline, Outcome, SequencerConfig};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use shared_types::{Address, PoolKey, Ticker, TokenAmount, U512};

    use crate::fixtures::{ChainBuilder, WRAPPED};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn amt(v: u64) -> TokenAmount {
        TokenAmount::from(v)
    }

    fn run(chain: &ChainBuilder, validator: ValidatorConfig) -> (Arc<InMemoryLedger>, BatchReport) {
        let ledger = Arc::new(InMemoryLedger::new());
        let pipeline =
            IngestionPipeline::new(Arc::clone(&ledger), validator, SequencerConfig::default());
        let report = pipeline
            .process_batch(chain.envelopes())
            .expect("batch within limits");
        (ledger, report)
    }

    fn balance(ledger: &InMemoryLedger, tick: &str, address: &str) -> TokenAmount {
        ledger
            .balance(&Ticker::new(tick), &Address::new(address))
            .expect("ledger available")
            .unwrap_or_default()
    }

    fn pair() -> PoolKey {
        PoolKey::new(Ticker::new("AAA"), Ticker::new("BBB"))
    }

    /// Two deployed tickers with DLp holding 1M AAA and 4M BBB.
    fn funded_chain() -> ChainBuilder {
        let mut chain = ChainBuilder::new();
        chain
            .deploy("DDeployer", "AAA", 10_000_000, 10_000_000)
            .deploy("DDeployer", "BBB", 10_000_000, 10_000_000)
            .next_block()
            .mint("DLp", "AAA", 1_000_000)
            .mint("DLp", "BBB", 4_000_000)
            .next_block();
        chain
    }

    // =============================================================================
    // POOL LIFECYCLE
    // =============================================================================

    #[test]
    fn test_pool_lifecycle() {
        let mut chain = funded_chain();
        chain
            .create("DLp", "AAA", "BBB", 100_000, 400_000)
            .next_block()
            // b_optimal = 10_000 × 400_000 / 100_000 = 40_000
            .add("DLp", "AAA", "BBB", 10_000, 50_000)
            .next_block()
            .remove("DLp", "AAA", "BBB", 22_000)
            .transfer("DLp", "AAA", 1_000, "DTrader")
            .next_block()
            .swap("DTrader", "AAA", "BBB", 1_000, 3_800);

        let (ledger, report) = run(&chain, ValidatorConfig::default());
        assert_eq!(report.applied(), 9, "report: {report:#?}");

        let key = pair();
        let pool = ledger.pool_state(&key).unwrap().expect("pool exists");
        // After remove: 99_000 / 396_000, then the swap
        let quote = quote_swap(amt(1_000), amt(99_000), amt(396_000)).unwrap();
        assert_eq!(quote.amount_out, amt(3_842));
        assert_eq!(pool.reserve_a, amt(100_000));
        assert_eq!(pool.reserve_b, amt(396_000) - quote.amount_out);
        assert_eq!(pool.liquidity_total, amt(198_000));

        // Constant product never shrinks across a swap
        let k_before = U512::from(99_000u64) * U512::from(396_000u64);
        let k_after = U512::from(pool.reserve_a) * U512::from(pool.reserve_b);
        assert!(k_after >= k_before);

        assert_eq!(balance(&ledger, "AAA", "DLp"), amt(900_000));
        assert_eq!(balance(&ledger, "BBB", "DLp"), amt(3_604_000));
        assert_eq!(balance(&ledger, &key.lp_ticker().to_string(), "DLp"), amt(198_000));
        assert_eq!(balance(&ledger, "BBB", "DTrader"), amt(3_842));
        assert_eq!(balance(&ledger, "AAA", "DTrader"), amt(0));

        let state = ledger.snapshot().unwrap();
        assert_eq!(state.circulating(&Ticker::new("AAA")), U512::from(1_000_000u64));
        assert_eq!(state.circulating(&Ticker::new("BBB")), U512::from(4_000_000u64));
    }

    #[test]
    fn test_remove_more_than_held() {
        let mut chain = funded_chain();
        chain
            .create("DLp", "AAA", "BBB", 100_000, 400_000)
            .next_block()
            .remove("DOther", "AAA", "BBB", 1)
            .remove("DLp", "AAA", "BBB", 200_001);

        let (_, report) = run(&chain, ValidatorConfig::default());
        let reasons = report.rejections_by_reason();
        assert_eq!(reasons.get(&RejectReason::InsufficientLiquidity), Some(&1));
        assert_eq!(reasons.get(&RejectReason::ExceedsPoolLiquidity), Some(&1));
    }

    // =============================================================================
    // SLIPPAGE
    // =============================================================================

    #[test]
    fn test_swap_below_minimum_leaves_ledger_untouched() {
        let mut chain = funded_chain();
        chain
            .create("DLp", "AAA", "BBB", 100_000, 400_000)
            .next_block()
            .swap("DLp", "AAA", "BBB", 1_000, 3_900);

        let (ledger, report) = run(&chain, ValidatorConfig::default());
        let last = report.operations.last().expect("swap reported");
        assert!(matches!(
            &last.outcome,
            Outcome::Rejected(r) if r.reason == RejectReason::SlippageExceeded
        ));

        let pool = ledger.pool_state(&pair()).unwrap().unwrap();
        assert_eq!((pool.reserve_a, pool.reserve_b), (amt(100_000), amt(400_000)));
    }

    #[test]
    fn test_swap_into_unknown_pool() {
        let mut chain = funded_chain();
        chain.swap("DLp", "AAA", "BBB", 1_000, 0);

        let (_, report) = run(&chain, ValidatorConfig::default());
        assert_eq!(
            report.rejections_by_reason().get(&RejectReason::PoolNotFound),
            Some(&1)
        );
    }

    #[test]
    fn test_add_slippage() {
        let mut chain = funded_chain();
        chain
            .create("DLp", "AAA", "BBB", 100_000, 400_000)
            .next_block()
            // b_optimal 40_000 < 50_000 and a_optimal 5_000 < 6_000
            .push(
                "DLp",
                r#"{"p":"pair-v1","op":"add","tick0":"AAA","tick1":"BBB","amt0":"10000","amt1":"20000","amt0_min":"6000","amt1_min":"50000"}"#,
            );

        let (_, report) = run(&chain, ValidatorConfig::default());
        assert_eq!(
            report.rejections_by_reason().get(&RejectReason::SlippageExceeded),
            Some(&1)
        );
    }

    // =============================================================================
    // BRIDGE
    // =============================================================================

    fn bridge_chain() -> ChainBuilder {
        let mut chain = ChainBuilder::new();
        chain
            .deposit("DBridge", 500)
            .next_block()
            .withdraw("DBridge", 600)
            .next_block()
            .withdraw("DBridge", 500);
        chain
    }

    #[test]
    fn test_bridge_enforced_withdraw() {
        let (ledger, report) = run(
            &bridge_chain(),
            ValidatorConfig {
                enforce_withdraw_balance: true,
            },
        );
        assert_eq!(report.applied(), 2);
        assert_eq!(
            report.rejections_by_reason().get(&RejectReason::InsufficientBalance),
            Some(&1)
        );
        assert_eq!(balance(&ledger, WRAPPED, "DBridge"), amt(0));
    }

    #[test]
    fn test_bridge_unconditional_withdraw() {
        let (ledger, report) = run(&bridge_chain(), ValidatorConfig::default());
        // Accepted by the rules, refused by the store
        assert_eq!(report.unapplied(), 1);
        assert_eq!(report.applied(), 2);
        assert!(report.is_complete());
        assert_eq!(balance(&ledger, WRAPPED, "DBridge"), amt(0));
    }

    #[test]
    fn test_bridge_rejects_other_tickers() {
        let mut chain = ChainBuilder::new();
        chain.push(
            "DBridge",
            r#"{"p":"wdoge","op":"deposit","tick":"DOGE","amt":"5"}"#,
        );
        let (_, report) = run(&chain, ValidatorConfig::default());
        assert_eq!(
            report.rejections_by_reason().get(&RejectReason::InvalidTicker),
            Some(&1)
        );
    }

    // =============================================================================
    // RUNTIME PARITY
    // =============================================================================

    #[test]
    fn test_runtime_matches_pipeline() {
        let mut chain = funded_chain();
        chain
            .create("DLp", "AAA", "BBB", 100_000, 400_000)
            .push_with(
                "DLp",
                r#"{"p":"drc-20","op":"transfer","tick":"AAA","amt":"7"}"#,
                "DOne,DTwo,DThree",
                1,
            )
            .next_block()
            .swap("DOne", "AAA", "BBB", 7, 0)
            .deposit("DBridge", 42)
            .mint("DLp", "AAA", 20_000_000);

        let (direct, report) = run(&chain, ValidatorConfig::default());

        let config = RuntimeConfig {
            sequencer: SequencerConfig {
                max_batch_size: 3,
                ..SequencerConfig::default()
            },
            ..RuntimeConfig::default()
        };
        let runtime = IndexerRuntime::new(&config);
        let summary = runtime.run(chain.to_jsonl().as_bytes()).unwrap();

        assert_eq!(summary.applied, report.applied());
        assert_eq!(summary.rejected, report.rejections_by_reason());
        assert_eq!(summary.batches, chain.envelopes().len().div_ceil(3));
        assert_eq!(
            runtime.ledger().snapshot().unwrap(),
            direct.snapshot().unwrap()
        );
    }

    // =============================================================================
    // DETERMINISM
    // =============================================================================

    const USERS: [&str; 5] = ["DAnn", "DBen", "DCid", "DDee", "DEve"];
    const TICKS: [&str; 4] = ["AAA", "BBB", "CCC", "DDD"];

    fn random_chain(seed: u64) -> ChainBuilder {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut chain = ChainBuilder::new();
        for tick in TICKS {
            chain.deploy("DDeployer", tick, 50_000, 1_000);
        }
        for _ in 0..20 {
            chain.next_block();
            for _ in 0..rng.gen_range(1..6) {
                let user = USERS[rng.gen_range(0..USERS.len())];
                let tick = TICKS[rng.gen_range(0..TICKS.len())];
                if rng.gen_bool(0.5) {
                    chain.mint(user, tick, rng.gen_range(1..1_200));
                } else {
                    let to = USERS[rng.gen_range(0..USERS.len())];
                    chain.transfer(user, tick, rng.gen_range(1..800), to);
                }
            }
        }
        chain
    }

    #[test]
    fn test_random_workloads_parallel_matches_sequential() {
        for seed in 0..8 {
            let chain = random_chain(seed);

            let sequential = Arc::new(InMemoryLedger::new());
            let sequential_report = IngestionPipeline::new(
                Arc::clone(&sequential),
                ValidatorConfig::default(),
                SequencerConfig {
                    parallel_lanes: false,
                    ..SequencerConfig::default()
                },
            )
            .process_batch(chain.envelopes())
            .unwrap();

            let (parallel, parallel_report) = run(&chain, ValidatorConfig::default());

            assert_eq!(parallel_report, sequential_report, "seed {seed}");
            assert_eq!(
                parallel.snapshot().unwrap(),
                sequential.snapshot().unwrap(),
                "seed {seed}"
            );
            // Minted supply equals what holders own
            for tick in TICKS {
                let ticker = Ticker::new(tick);
                let minted = parallel
                    .supply_info(&ticker)
                    .unwrap()
                    .map(|s| s.minted_sum)
                    .unwrap_or_default();
                assert_eq!(
                    parallel.snapshot().unwrap().circulating(&ticker),
                    U512::from(minted),
                    "seed {seed} {tick}"
                );
            }
        }
    }
}
