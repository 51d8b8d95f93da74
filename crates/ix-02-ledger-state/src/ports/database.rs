//! Storage port for ledger mutations.

use std::sync::Arc;

use ix_01_validation::{Approval, LedgerQuery};

use crate::domain::{ApplyError, Journal};

/// A ledger that can both answer validator reads and apply approvals.
///
/// `apply` is all-or-nothing. It must not interleave with another `apply`
/// or with a query that is part of the same validate-then-apply step; the
/// sequencer guarantees the latter by running operations that share a key
/// on one lane.
pub trait LedgerStore: LedgerQuery {
    fn apply(&self, approval: &Approval) -> Result<Journal, ApplyError>;
}

impl<T: LedgerStore + ?Sized> LedgerStore for Arc<T> {
    fn apply(&self, approval: &Approval) -> Result<Journal, ApplyError> {
        (**self).apply(approval)
    }
}
