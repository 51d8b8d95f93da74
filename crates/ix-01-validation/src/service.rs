//! # Dispatcher
//!
//! Routes a decoded operation to its protocol validator. Holds the ledger
//! port and the rule switches and nothing else, so one instance can be
//! shared by every ingestion worker.

use std::sync::Arc;

use shared_types::{InscriptionEnvelope, WireError};
use tracing::{debug, error, instrument, warn};

use crate::config::ValidatorConfig;
use crate::domain::{Approval, Operation, Rejection, ValidationError};
use crate::ports::{LedgerQuery, ValidationApi};
use crate::validators::{BridgeValidator, SwapValidator, TokenValidator};

pub struct Dispatcher<L: LedgerQuery> {
    ledger: Arc<L>,
    config: ValidatorConfig,
}

impl<L: LedgerQuery> Dispatcher<L> {
    pub fn new(ledger: Arc<L>, config: ValidatorConfig) -> Self {
        Self { ledger, config }
    }

    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    fn route(&self, operation: &Operation) -> Result<Approval, ValidationError> {
        let ledger = self.ledger.as_ref();
        match operation {
            Operation::Token(op) => TokenValidator::new(ledger).validate(op),
            Operation::Swap(op) => SwapValidator::new(ledger).validate(op),
            Operation::Bridge(op) => BridgeValidator::new(ledger, &self.config).validate(op),
        }
    }

    /// Verdict for a document that never decoded into an envelope.
    pub fn reject_undecodable(err: WireError) -> ValidationError {
        let rejection = Rejection::from(err);
        warn!(reason = rejection.reason.code(), detail = ?rejection.detail, "Undecodable inscription");
        ValidationError::Rejected(rejection)
    }
}

fn log_outcome(result: &Result<Approval, ValidationError>) {
    match result {
        Ok(approval) => debug!(kind = approval.kind().op_name(), "Operation accepted"),
        Err(ValidationError::Rejected(rejection)) => warn!(
            reason = rejection.reason.code(),
            detail = ?rejection.detail,
            "Operation rejected"
        ),
        Err(ValidationError::Ledger(err)) => error!(error = %err, "Ledger query failed"),
    }
}

impl<L: LedgerQuery> ValidationApi for Dispatcher<L> {
    #[instrument(
        skip(self, operation),
        fields(protocol = operation.kind().protocol(), op = operation.kind().op_name())
    )]
    fn validate(&self, operation: &Operation) -> Result<Approval, ValidationError> {
        let result = self.route(operation);
        log_outcome(&result);
        result
    }

    #[instrument(
        skip(self, envelope),
        fields(
            location = %envelope.location,
            protocol = envelope.inscription.protocol(),
            op = envelope.inscription.op()
        )
    )]
    fn validate_envelope(
        &self,
        envelope: &InscriptionEnvelope,
    ) -> Result<Approval, ValidationError> {
        let result = Operation::from_envelope(envelope)
            .map_err(ValidationError::from)
            .and_then(|operation| self.route(&operation));
        log_outcome(&result);
        result
    }
}
