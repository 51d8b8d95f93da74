//! # Inbound Ports (Driving Ports)
//!
//! The API ingestion calls after decoding an inscription and before it
//! requests a ledger mutation.

use shared_types::InscriptionEnvelope;

use crate::domain::{Approval, Operation, ValidationError};

/// Validation entry point.
///
/// Implementations hold no mutable state and are safe to call from many
/// ingestion workers at once.
pub trait ValidationApi: Send + Sync {
    /// Decide a converted operation against the current ledger snapshot.
    fn validate(&self, operation: &Operation) -> Result<Approval, ValidationError>;

    /// Convert an envelope through the numeric layer, then decide it.
    fn validate_envelope(&self, envelope: &InscriptionEnvelope)
        -> Result<Approval, ValidationError>;
}
