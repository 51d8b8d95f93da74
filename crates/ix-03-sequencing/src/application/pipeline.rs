//! Ingestion Pipeline
//!
//! Main service implementing `IngestionApi`.
//!
//! 1. Convert every envelope; conversion failures are final rejections
//! 2. Plan lanes over the ledger keys of the converted operations
//! 3. Run each lane's validate-then-apply steps in chain order
//! 4. Merge outcomes back into chain order

use std::sync::Arc;

use ix_01_validation::{
    Dispatcher, LocatedOperation, Operation, ValidationApi, ValidationError, ValidatorConfig,
};
use ix_02_ledger_state::{ApplyError, LedgerStore};
use rayon::prelude::*;
use shared_types::InscriptionEnvelope;
use tracing::{debug, error, info, instrument, warn};

use crate::algorithms::{plan_lanes, Lane};
use crate::config::SequencerConfig;
use crate::domain::{BatchReport, OperationReport, Outcome, PipelineError};
use crate::ports::IngestionApi;

/// Fewer lanes than this run on the calling thread.
pub const PARALLEL_THRESHOLD: usize = 4;

pub struct IngestionPipeline<S: LedgerStore> {
    dispatcher: Dispatcher<S>,
    store: Arc<S>,
    config: SequencerConfig,
}

impl<S: LedgerStore> IngestionPipeline<S> {
    /// Validator and store share `store`, so every verdict reads the state
    /// the previous step of its lane wrote.
    pub fn new(store: Arc<S>, validator: ValidatorConfig, config: SequencerConfig) -> Self {
        Self {
            dispatcher: Dispatcher::new(Arc::clone(&store), validator),
            store,
            config,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    fn check_batch(&self, size: usize) -> Result<(), PipelineError> {
        if size == 0 {
            return Err(PipelineError::EmptyBatch);
        }
        if size > self.config.max_batch_size {
            return Err(PipelineError::BatchTooLarge {
                size,
                max: self.config.max_batch_size,
            });
        }
        Ok(())
    }

    /// One validate-then-apply step.
    fn step(&self, located: &LocatedOperation) -> Outcome {
        match self.dispatcher.validate(&located.operation) {
            Ok(approval) => match self.store.apply(&approval) {
                Ok(journal) => Outcome::Applied {
                    approval,
                    movements: journal.len(),
                },
                Err(ApplyError::Ledger(err)) => Outcome::Halted(err),
                Err(err) => Outcome::Unapplied(err),
            },
            Err(ValidationError::Rejected(rejection)) => Outcome::Rejected(rejection),
            Err(ValidationError::Ledger(err)) => Outcome::Halted(err),
        }
    }

    fn run_lane(&self, lane: &Lane, batch: &[LocatedOperation]) -> Vec<(usize, Outcome)> {
        let mut outcomes = Vec::with_capacity(lane.operations.len());
        let mut halted = false;
        for &index in &lane.operations {
            if halted {
                outcomes.push((index, Outcome::Skipped));
                continue;
            }
            let located = &batch[index];
            let outcome = self.step(located);
            if let Outcome::Halted(err) = &outcome {
                error!(location = %located.location, error = %err, "Lane halted on ledger failure");
                halted = true;
            }
            outcomes.push((index, outcome));
        }
        debug!(operations = lane.operations.len(), halted, "Lane finished");
        outcomes
    }
}

impl<S: LedgerStore> IngestionApi for IngestionPipeline<S> {
    #[instrument(skip(self, batch), fields(size = batch.len()))]
    fn process_batch(
        &self,
        batch: Vec<InscriptionEnvelope>,
    ) -> Result<BatchReport, PipelineError> {
        self.check_batch(batch.len())?;

        let mut reports = Vec::with_capacity(batch.len());
        let mut located = Vec::with_capacity(batch.len());
        // report index of each converted operation
        let mut slots = Vec::with_capacity(batch.len());

        for envelope in &batch {
            let outcome = match Operation::from_envelope(envelope) {
                Ok(operation) => {
                    slots.push(reports.len());
                    located.push(LocatedOperation {
                        location: envelope.location,
                        operation,
                    });
                    // Overwritten once its lane runs
                    Outcome::Skipped
                }
                Err(rejection) => {
                    warn!(
                        location = %envelope.location,
                        reason = rejection.reason.code(),
                        "Operation rejected at conversion"
                    );
                    Outcome::Rejected(rejection)
                }
            };
            reports.push(OperationReport {
                location: envelope.location,
                protocol: envelope.inscription.protocol(),
                op: envelope.inscription.op(),
                outcome,
            });
        }

        let lanes = plan_lanes(&located);
        info!(
            operations = located.len(),
            lanes = lanes.len(),
            "Lanes planned"
        );

        let results: Vec<Vec<(usize, Outcome)>> =
            if self.config.parallel_lanes && lanes.len() >= PARALLEL_THRESHOLD {
                lanes
                    .par_iter()
                    .map(|lane| self.run_lane(lane, &located))
                    .collect()
            } else {
                lanes
                    .iter()
                    .map(|lane| self.run_lane(lane, &located))
                    .collect()
            };

        let halted_lanes = results
            .iter()
            .filter(|lane| lane.iter().any(|(_, o)| matches!(o, Outcome::Halted(_))))
            .count();
        for (index, outcome) in results.into_iter().flatten() {
            reports[slots[index]].outcome = outcome;
        }
        reports.sort_by_key(|r| r.location);

        let report = BatchReport {
            operations: reports,
            lane_count: lanes.len(),
            halted_lanes,
        };
        info!(
            applied = report.applied(),
            rejected = report.rejected(),
            unapplied = report.unapplied(),
            pending = report.pending(),
            "Batch processed"
        );
        Ok(report)
    }
}
