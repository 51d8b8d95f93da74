//! # IX-01: Inscription Validation Subsystem
//!
//! Deterministic accept/reject decisions for drc-20 tokens, pair-v1
//! constant-product pools and the wdoge bridge.
//!
//! ## Architecture
//!
//! - **Domain**: decoded operations, rejection reasons, approvals, AMM math
//! - **Validators**: one per protocol, reading through the ledger port
//! - **Ports**: Inbound (`ValidationApi`) and Outbound (`LedgerQuery`)
//! - **Service**: `Dispatcher`, the stateless router
//!
//! ## Determinism
//!
//! Every verdict is a pure function of the operation and one ledger
//! snapshot. All arithmetic is unsigned integer with floor division; there
//! is no floating point anywhere in the decision path.

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;
pub mod validators;

pub use config::ValidatorConfig;
pub use domain::amm::{quote_swap, swap_fee, SwapQuote};
pub use domain::*;
pub use ports::inbound::ValidationApi;
pub use ports::outbound::LedgerQuery;
pub use service::Dispatcher;
pub use validators::{BridgeValidator, SwapValidator, TokenValidator};
