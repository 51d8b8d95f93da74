//! # Ports Layer
//!
//! - **Inbound** (`inbound.rs`): `ValidationApi`, what ingestion calls.
//! - **Outbound** (`outbound.rs`): `LedgerQuery`, what validators read.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
