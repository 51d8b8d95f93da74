//! # Envelope Runner
//!
//! Reads one JSON envelope per line and feeds them to the sequencer in
//! chunks of `max_batch_size`. Chunks run one after another, so the input
//! must already be in chain order across chunk boundaries.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::sync::Arc;

use anyhow::{Context, Result};
use ix_01_validation::{Dispatcher, RejectReason};
use ix_02_ledger_state::InMemoryLedger;
use ix_03_sequencing::{BatchReport, IngestionApi, IngestionPipeline};
use shared_types::{ChainLocation, InscriptionEnvelope, RawEnvelope};
use tracing::{error, info, instrument, warn};

use crate::config::RuntimeConfig;

/// Totals over a whole input stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Non-blank input lines.
    pub lines: usize,
    /// Lines that are not an envelope at all.
    pub malformed_lines: usize,
    pub batches: usize,
    pub applied: usize,
    pub unapplied: usize,
    pub rejected: BTreeMap<RejectReason, usize>,
    pub halted_lanes: usize,
    /// Operations left unprocessed by a ledger failure.
    pub pending: Vec<ChainLocation>,
}

impl RunSummary {
    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }

    pub fn is_complete(&self) -> bool {
        self.halted_lanes == 0
    }

    pub fn log(&self) {
        info!(
            lines = self.lines,
            malformed = self.malformed_lines,
            batches = self.batches,
            applied = self.applied,
            unapplied = self.unapplied,
            rejected = self.rejected_total(),
            halted_lanes = self.halted_lanes,
            "Run finished"
        );
        for (reason, count) in &self.rejected {
            info!(reason = reason.code(), count, "Rejections");
        }
        if !self.pending.is_empty() {
            error!(pending = self.pending.len(), first = %self.pending[0], "Operations left pending");
        }
    }

    fn record_rejection(&mut self, reason: RejectReason) {
        *self.rejected.entry(reason).or_insert(0) += 1;
    }

    fn absorb(&mut self, report: &BatchReport) {
        self.batches += 1;
        self.applied += report.applied();
        self.unapplied += report.unapplied();
        for (reason, count) in report.rejections_by_reason() {
            *self.rejected.entry(reason).or_insert(0) += count;
        }
        self.halted_lanes += report.halted_lanes;
        self.pending.extend(report.pending_locations());
    }
}

pub struct IndexerRuntime {
    ledger: Arc<InMemoryLedger>,
    pipeline: IngestionPipeline<InMemoryLedger>,
    chunk_size: usize,
}

impl IndexerRuntime {
    pub fn new(config: &RuntimeConfig) -> Self {
        Self::with_ledger(Arc::new(InMemoryLedger::new()), config)
    }

    /// Run against a pre-seeded ledger.
    pub fn with_ledger(ledger: Arc<InMemoryLedger>, config: &RuntimeConfig) -> Self {
        let pipeline = IngestionPipeline::new(
            Arc::clone(&ledger),
            config.validator.clone(),
            config.sequencer.clone(),
        );
        Self {
            ledger,
            pipeline,
            chunk_size: config.sequencer.max_batch_size.max(1),
        }
    }

    pub fn ledger(&self) -> &Arc<InMemoryLedger> {
        &self.ledger
    }

    /// Process every envelope in `reader`.
    ///
    /// Stops after the first chunk with a halted lane: later chunks may
    /// depend on the operations it left pending.
    #[instrument(skip_all)]
    pub fn run(&self, reader: impl BufRead) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut chunk: Vec<InscriptionEnvelope> = Vec::with_capacity(self.chunk_size);

        for (index, line) in reader.lines().enumerate() {
            let number = index + 1;
            let line = line.with_context(|| format!("reading input line {number}"))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            summary.lines += 1;

            let raw: RawEnvelope = match serde_json::from_str(line) {
                Ok(raw) => raw,
                Err(err) => {
                    warn!(line = number, error = %err, "Skipping malformed envelope");
                    summary.malformed_lines += 1;
                    continue;
                }
            };
            match raw.decode() {
                Ok(envelope) => chunk.push(envelope),
                Err(err) => {
                    let verdict = Dispatcher::<InMemoryLedger>::reject_undecodable(err);
                    if let Some(reason) = verdict.reason() {
                        summary.record_rejection(reason);
                    }
                }
            }

            if chunk.len() == self.chunk_size && !self.flush(&mut chunk, &mut summary)? {
                return Ok(summary);
            }
        }

        if !chunk.is_empty() {
            self.flush(&mut chunk, &mut summary)?;
        }
        Ok(summary)
    }

    /// Returns false when the chunk left operations pending.
    fn flush(&self, chunk: &mut Vec<InscriptionEnvelope>, summary: &mut RunSummary) -> Result<bool> {
        let report = self
            .pipeline
            .process_batch(std::mem::take(chunk))
            .context("processing batch")?;
        summary.absorb(&report);
        if !report.is_complete() {
            error!(
                halted_lanes = report.halted_lanes,
                "Ledger failure; stopping before the next batch"
            );
        }
        Ok(report.is_complete())
    }
}
