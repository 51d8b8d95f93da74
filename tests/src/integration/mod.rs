//! # Integration Tests
//!
//! End-to-end flows across the ix-* crates.

pub mod flows;
