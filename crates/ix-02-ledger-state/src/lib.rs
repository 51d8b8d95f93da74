//! # IX-02: Ledger State Subsystem
//!
//! Owns balances, token supplies and AMM pools. Answers the validator's
//! read port and applies approvals atomically.
//!
//! ## Architecture
//!
//! - **Domain**: `LedgerState` tables and staged approval application
//! - **Ports**: `LedgerStore` (write side); reads use `LedgerQuery`
//! - **Adapters**: `InMemoryLedger` behind a `RwLock`
//!
//! Durable storage is out of scope; any backend implementing both ports can
//! replace the in-memory adapter.

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::InMemoryLedger;
pub use domain::*;
pub use ports::LedgerStore;
