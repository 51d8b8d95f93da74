//! # Ports Layer
//!
//! - **Database** (`database.rs`): `LedgerStore`, the write side that the
//!   ingestion pipeline drives after a positive verdict.
//!
//! The read side is `ix_01_validation::LedgerQuery`; every store implements
//! both.

pub mod database;

pub use database::*;
