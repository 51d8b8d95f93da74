//! # Validator Configuration
//!
//! Opt-in rule switches. The swap fee and the add-liquidity policy are
//! consensus constants and not configurable.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Reject a wdoge withdraw that the holder's wrapped balance cannot
    /// cover. Off by default: withdraw is accepted unconditionally.
    pub enforce_withdraw_balance: bool,
}
