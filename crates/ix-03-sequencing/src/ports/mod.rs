//! Ports for keyed sequencing

pub mod inbound;

pub use inbound::*;
