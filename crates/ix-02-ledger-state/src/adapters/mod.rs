//! Adapters implementing the ledger ports.

pub mod memory_db;

pub use memory_db::InMemoryLedger;
