//! # Shared Types Crate
//!
//! This crate contains the ledger entities, the numeric layer and the
//! inscription wire schema used by every `ix-*` crate.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: decimal-string parsing and canonical pair
//!   ordering live in [`numeric`] and nowhere else.
//! - **No Floating Point**: every quantity is a [`TokenAmount`] (`U256`);
//!   intermediate products are computed in `U512`.
//! - **Exact Wire Keys**: [`wire::Inscription`] is a tagged union whose
//!   serialized keys match the cross-indexer table verbatim.

pub mod entities;
pub mod errors;
pub mod numeric;
pub mod wire;

pub use entities::*;
pub use errors::*;
pub use numeric::{apply_default_decimals, parse_amount, parse_bound, sort_token_pair, SortedPair};
pub use wire::{Inscription, InscriptionEnvelope, RawEnvelope};
