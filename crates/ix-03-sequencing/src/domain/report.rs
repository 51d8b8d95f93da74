//! Per-operation outcomes of one batch.

use std::collections::BTreeMap;

use ix_01_validation::{Approval, RejectReason, Rejection};
use ix_02_ledger_state::ApplyError;
use shared_types::{ChainLocation, LedgerError};

/// What happened to one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Accepted and written.
    Applied { approval: Approval, movements: usize },
    /// Invalid under the protocol rules; final.
    Rejected(Rejection),
    /// Accepted by the rules but refused by the store, e.g. a withdraw the
    /// holder cannot cover. Deterministic, so final as well.
    Unapplied(ApplyError),
    /// The ledger failed while this operation was in flight. Nothing was
    /// written for it; it must be retried.
    Halted(LedgerError),
    /// Not attempted because an earlier operation on the same lane halted.
    Skipped,
}

impl Outcome {
    /// The operation still needs processing.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Halted(_) | Self::Skipped)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationReport {
    pub location: ChainLocation,
    pub protocol: &'static str,
    pub op: &'static str,
    pub outcome: Outcome,
}

/// Outcomes in chain order plus lane statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub operations: Vec<OperationReport>,
    pub lane_count: usize,
    pub halted_lanes: usize,
}

impl BatchReport {
    pub fn applied(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Applied { .. }))
    }

    pub fn rejected(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Rejected(_)))
    }

    pub fn unapplied(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Unapplied(_)))
    }

    pub fn pending(&self) -> usize {
        self.count(Outcome::is_pending)
    }

    /// True when no lane halted.
    pub fn is_complete(&self) -> bool {
        self.halted_lanes == 0
    }

    /// Locations to resubmit, in chain order.
    ///
    /// Every lane stops at its first halt, so resubmitting exactly these
    /// never replays an applied operation.
    pub fn pending_locations(&self) -> Vec<ChainLocation> {
        self.operations
            .iter()
            .filter(|r| r.outcome.is_pending())
            .map(|r| r.location)
            .collect()
    }

    pub fn rejections_by_reason(&self) -> BTreeMap<RejectReason, usize> {
        let mut counts = BTreeMap::new();
        for report in &self.operations {
            if let Outcome::Rejected(rejection) = &report.outcome {
                *counts.entry(rejection.reason).or_insert(0) += 1;
            }
        }
        counts
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.operations.iter().filter(|r| pred(&r.outcome)).count()
    }
}
