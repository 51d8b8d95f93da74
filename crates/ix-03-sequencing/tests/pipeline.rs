//! # Keyed Sequencing Integration Tests (ix-03)
//!
//! Feeds whole batches through `IngestionPipeline` over the in-memory
//! ledger.
//!
//! ## Test Categories
//!
//! 1. **End-to-End** - tokens, pool and bridge in one batch
//! 2. **Lane Independence** - shuffled input, parallel vs sequential
//! 3. **Ledger Failures** - halted lanes, skipped tails, resubmission

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ix_01_validation::{Approval, LedgerQuery, RejectReason, ValidatorConfig};
use ix_02_ledger_state::{ApplyError, InMemoryLedger, Journal, LedgerStore};
use ix_03_sequencing::{IngestionApi, IngestionPipeline, Outcome, SequencerConfig};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use shared_types::{
    Address, ChainLocation, Inscription, InscriptionEnvelope, LedgerError, PoolKey, PoolState,
    SupplyInfo, Ticker, TokenAmount, U512,
};

// =============================================================================
// TEST HELPERS
// =============================================================================

fn amt(v: u64) -> TokenAmount {
    TokenAmount::from(v)
}

fn envelope(height: u64, tx: u32, sender: &str, json: &str) -> InscriptionEnvelope {
    InscriptionEnvelope::new(
        ChainLocation::new(height, tx),
        Address::new(sender),
        Inscription::from_json(json).expect("fixture must decode"),
    )
}

fn deploy(height: u64, tx: u32, tick: &str, max: u64, lim: u64) -> InscriptionEnvelope {
    envelope(
        height,
        tx,
        "DDeployer",
        &format!(r#"{{"p":"drc-20","op":"deploy","tick":"{tick}","max":"{max}","lim":"{lim}"}}"#),
    )
}

fn mint(height: u64, tx: u32, sender: &str, tick: &str, amount: u64) -> InscriptionEnvelope {
    envelope(
        height,
        tx,
        sender,
        &format!(r#"{{"p":"drc-20","op":"mint","tick":"{tick}","amt":"{amount}"}}"#),
    )
}

fn transfer(
    height: u64,
    tx: u32,
    sender: &str,
    tick: &str,
    amount: u64,
    to: &str,
) -> InscriptionEnvelope {
    envelope(
        height,
        tx,
        sender,
        &format!(r#"{{"p":"drc-20","op":"transfer","tick":"{tick}","amt":"{amount}"}}"#),
    )
    .with_receivers(to)
}

fn pipeline<S: LedgerStore>(store: Arc<S>, parallel_lanes: bool) -> IngestionPipeline<S> {
    IngestionPipeline::new(
        store,
        ValidatorConfig::default(),
        SequencerConfig {
            parallel_lanes,
            ..SequencerConfig::default()
        },
    )
}

fn balance<L: LedgerQuery>(ledger: &L, tick: &str, address: &str) -> TokenAmount {
    ledger
        .balance(&Ticker::new(tick), &Address::new(address))
        .expect("ledger available")
        .unwrap_or_default()
}

// =============================================================================
// END-TO-END
// =============================================================================

#[test]
fn test_full_batch_tokens_pool_and_bridge() {
    let ledger = Arc::new(InMemoryLedger::new());
    let p = pipeline(Arc::clone(&ledger), true);

    let batch = vec![
        // Submitted newest first; sequencing must restore chain order
        envelope(
            5,
            0,
            "DBridge",
            r#"{"p":"wdoge","op":"withdraw","tick":"WDOGE(WRAPPED-DOGE)","amt":"200"}"#,
        ),
        envelope(
            4,
            0,
            "DTrader",
            r#"{"p":"pair-v1","op":"swap","tick0":"DOGE","tick1":"FOO","amt0":"10000","amt1":"0","amt1_min":"19000"}"#,
        ),
        transfer(3, 1, "DAlice", "DOGE", 10_000, "DTrader"),
        envelope(
            3,
            0,
            "DAlice",
            r#"{"p":"pair-v1","op":"create","tick0":"DOGE","tick1":"FOO","amt0":"1000000","amt1":"2000000"}"#,
        ),
        envelope(
            2,
            5,
            "DBridge",
            r#"{"p":"wdoge","op":"deposit","tick":"WDOGE(WRAPPED-DOGE)","amt":"500"}"#,
        ),
        mint(2, 1, "DAlice", "DOGE", 5_000_000),
        mint(2, 0, "DAlice", "FOO", 1_000_000).with_repeat(3),
        deploy(1, 1, "DOGE", 10_000_000, 5_000_000),
        deploy(1, 0, "FOO", 10_000_000, 1_000_000),
    ];

    let report = p.process_batch(batch).unwrap();

    assert_eq!(report.applied(), 9, "report: {report:#?}");
    assert!(report.is_complete());
    // DOGE/FOO joined by the pool; the bridge runs on its own lane
    assert_eq!(report.lane_count, 2);
    assert!(report
        .operations
        .windows(2)
        .all(|pair| pair[0].location < pair[1].location));

    let swap = report
        .operations
        .iter()
        .find(|r| r.op == "swap")
        .expect("swap reported");
    match &swap.outcome {
        Outcome::Applied {
            approval: Approval::Swap {
                fee, amount_out, ..
            },
            movements,
        } => {
            assert_eq!(*fee, amt(300));
            assert_eq!(*amount_out, amt(19_213));
            assert_eq!(*movements, 4);
        }
        other => panic!("unexpected swap outcome {other:?}"),
    }

    assert_eq!(balance(&*ledger, "DOGE", "DAlice"), amt(3_990_000));
    assert_eq!(balance(&*ledger, "FOO", "DAlice"), amt(1_000_000));
    assert_eq!(balance(&*ledger, "DOGE", "DTrader"), amt(0));
    assert_eq!(balance(&*ledger, "FOO", "DTrader"), amt(19_213));
    assert_eq!(balance(&*ledger, "WDOGE(WRAPPED-DOGE)", "DBridge"), amt(300));

    let key = PoolKey::new(Ticker::new("DOGE"), Ticker::new("FOO"));
    let pool = ledger.pool_state(&key).unwrap().expect("pool created");
    assert_eq!(pool.reserve_a, amt(1_010_000));
    assert_eq!(pool.reserve_b, amt(1_980_787));
    assert_eq!(pool.liquidity_total, amt(1_414_213));
    assert_eq!(balance(&*ledger, &key.lp_ticker().to_string(), "DAlice"), amt(1_414_213));

    // Supply is conserved across holders and the pool's reserve owner
    let state = ledger.snapshot().unwrap();
    assert_eq!(state.circulating(&Ticker::new("FOO")), U512::from(3_000_000u64));
    assert_eq!(state.circulating(&Ticker::new("DOGE")), U512::from(5_000_000u64));
}

#[test]
fn test_later_operation_sees_earlier_write() {
    let ledger = Arc::new(InMemoryLedger::new().with_token("FOO", amt(1_000), amt(600), amt(0)));
    let p = pipeline(Arc::clone(&ledger), false);

    let report = p
        .process_batch(vec![
            mint(1, 0, "D1", "FOO", 600),
            // Same ticker: validated against the 600 already minted
            mint(1, 1, "D2", "FOO", 600),
            mint(1, 2, "D3", "FOO", 400),
        ])
        .unwrap();

    assert_eq!(report.applied(), 2);
    assert_eq!(
        report.rejections_by_reason().get(&RejectReason::ExceedsMaxSupply),
        Some(&1)
    );
    assert_eq!(
        ledger.supply_info(&Ticker::new("FOO")).unwrap(),
        Some(SupplyInfo::new(amt(1_000), amt(600)).with_minted(amt(1_000)))
    );
}

#[test]
fn test_pool_seeded_ledger_swap_round() {
    let key = PoolKey::new(Ticker::new("DOGE"), Ticker::new("FOO"));
    let ledger = Arc::new(
        InMemoryLedger::new()
            .with_pool(
                PoolState::empty(key.clone())
                    .with_reserves(amt(1_000_000), amt(2_000_000))
                    .with_liquidity(amt(1_414_213)),
            )
            .with_balance("FOO", "DTrader", amt(20_000)),
    );
    let p = pipeline(Arc::clone(&ledger), true);

    // Reverse direction: FOO in, DOGE out
    let report = p
        .process_batch(vec![envelope(
            1,
            0,
            "DTrader",
            r#"{"p":"pair-v1","op":"swap","tick0":"FOO","tick1":"DOGE","amt0":"20000","amt1":"0"}"#,
        )])
        .unwrap();
    assert_eq!(report.applied(), 1);

    let pool = ledger.pool_state(&key).unwrap().unwrap();
    assert_eq!(pool.reserve_b, amt(2_020_000));
    assert_eq!(balance(&*ledger, "DOGE", "DTrader") + pool.reserve_a, amt(1_000_000));
}

// =============================================================================
// LANE INDEPENDENCE
// =============================================================================

const TICKERS: [&str; 8] = ["AAA", "BBB", "CCC", "DDD", "EEE", "FFF", "GGG", "HHH"];

/// Eight unrelated tickers, each with its own deploy/mint/transfer history.
fn independent_batch() -> Vec<InscriptionEnvelope> {
    let mut batch = Vec::new();
    for (i, tick) in TICKERS.iter().enumerate() {
        let tx = i as u32;
        batch.push(deploy(1, tx, tick, 10_000, 1_000));
        batch.push(mint(2, tx, "DAlice", tick, 1_000));
        batch.push(mint(3, tx, "DBob", tick, 700));
        batch.push(transfer(4, tx, "DAlice", tick, 300, "DBob,DCarol"));
        // Over-spend after the transfer left DAlice with 400
        batch.push(transfer(5, tx, "DAlice", tick, 500, "DCarol"));
    }
    batch
}

#[test]
fn test_parallel_matches_sequential_on_shuffled_input() {
    let mut shuffled = independent_batch();
    shuffled.shuffle(&mut StdRng::seed_from_u64(7));

    let sequential_ledger = Arc::new(InMemoryLedger::new());
    let sequential = pipeline(Arc::clone(&sequential_ledger), false)
        .process_batch(independent_batch())
        .unwrap();

    let parallel_ledger = Arc::new(InMemoryLedger::new());
    let parallel = pipeline(Arc::clone(&parallel_ledger), true)
        .process_batch(shuffled)
        .unwrap();

    assert_eq!(parallel.lane_count, TICKERS.len());
    assert_eq!(parallel, sequential);
    assert_eq!(
        parallel_ledger.snapshot().unwrap(),
        sequential_ledger.snapshot().unwrap()
    );

    assert_eq!(parallel.applied(), TICKERS.len() * 4);
    assert_eq!(
        parallel.rejections_by_reason().get(&RejectReason::InsufficientBalance),
        Some(&TICKERS.len())
    );
    for tick in TICKERS {
        assert_eq!(balance(&*parallel_ledger, tick, "DAlice"), amt(400));
        assert_eq!(balance(&*parallel_ledger, tick, "DBob"), amt(1_000));
        assert_eq!(balance(&*parallel_ledger, tick, "DCarol"), amt(300));
    }
}

#[test]
fn test_many_seeds_same_ledger() {
    let reference = Arc::new(InMemoryLedger::new());
    pipeline(Arc::clone(&reference), false)
        .process_batch(independent_batch())
        .unwrap();
    let expected = reference.snapshot().unwrap();

    for seed in 0..16 {
        let mut batch = independent_batch();
        batch.shuffle(&mut StdRng::seed_from_u64(seed));
        let ledger = Arc::new(InMemoryLedger::new());
        pipeline(Arc::clone(&ledger), true)
            .process_batch(batch)
            .unwrap();
        assert_eq!(ledger.snapshot().unwrap(), expected, "seed {seed}");
    }
}

// =============================================================================
// LEDGER FAILURES
// =============================================================================

/// Store whose reads for one ticker fail until repaired.
struct FlakyStore {
    inner: InMemoryLedger,
    broken: Ticker,
    down: AtomicBool,
}

impl FlakyStore {
    fn new(broken: &str) -> Self {
        Self {
            inner: InMemoryLedger::new(),
            broken: Ticker::new(broken),
            down: AtomicBool::new(true),
        }
    }

    fn repair(&self) {
        self.down.store(false, Ordering::SeqCst);
    }
}

impl LedgerQuery for FlakyStore {
    fn supply_info(&self, ticker: &Ticker) -> Result<Option<SupplyInfo>, LedgerError> {
        if *ticker == self.broken && self.down.load(Ordering::SeqCst) {
            return Err(LedgerError::Unavailable(format!("shard for {ticker}")));
        }
        self.inner.supply_info(ticker)
    }

    fn balance(
        &self,
        ticker: &Ticker,
        address: &Address,
    ) -> Result<Option<TokenAmount>, LedgerError> {
        self.inner.balance(ticker, address)
    }

    fn pool_state(&self, key: &PoolKey) -> Result<Option<PoolState>, LedgerError> {
        self.inner.pool_state(key)
    }
}

impl LedgerStore for FlakyStore {
    fn apply(&self, approval: &Approval) -> Result<Journal, ApplyError> {
        self.inner.apply(approval)
    }
}

#[test]
fn test_halted_lane_skips_tail_and_resubmits() {
    let store = Arc::new(FlakyStore::new("BAD"));
    let p = pipeline(Arc::clone(&store), false);

    let batch = vec![
        deploy(1, 0, "BAD", 100, 10),
        mint(1, 1, "D1", "BAD", 10),
        deploy(1, 2, "GOOD", 100, 10),
        mint(2, 0, "D1", "BAD", 10),
        mint(2, 1, "D1", "GOOD", 10),
    ];
    let report = p.process_batch(batch.clone()).unwrap();

    assert_eq!(report.halted_lanes, 1);
    assert!(!report.is_complete());
    assert_eq!(report.applied(), 2);
    assert!(matches!(
        report.operations[0].outcome,
        Outcome::Halted(LedgerError::Unavailable(_))
    ));
    assert_eq!(report.operations[1].outcome, Outcome::Skipped);
    assert_eq!(
        report.pending_locations(),
        vec![
            ChainLocation::new(1, 0),
            ChainLocation::new(1, 1),
            ChainLocation::new(2, 0),
        ]
    );
    assert_eq!(balance(&store.inner, "GOOD", "D1"), amt(10));
    assert_eq!(balance(&store.inner, "BAD", "D1"), amt(0));

    store.repair();
    let pending = report.pending_locations();
    let retry: Vec<_> = batch
        .into_iter()
        .filter(|e| pending.contains(&e.location))
        .collect();
    let report = p.process_batch(retry).unwrap();

    assert!(report.is_complete());
    assert_eq!(report.applied(), 3);
    assert_eq!(balance(&store.inner, "BAD", "D1"), amt(20));
    // GOOD was not replayed
    assert_eq!(balance(&store.inner, "GOOD", "D1"), amt(10));
}
