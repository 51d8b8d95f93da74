//! # Inscription-Ledger Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/
//! │   ├── fixtures.rs   # ChainBuilder: envelopes laid out block by block
//! │   └── integration/  # Flows across validation, ledger and sequencing
//! └── benches/          # criterion benchmarks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p ix-tests
//!
//! # Benchmarks
//! cargo bench -p ix-tests
//! ```

pub mod fixtures;
pub mod integration;
