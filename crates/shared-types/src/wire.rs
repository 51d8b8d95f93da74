//! # Inscription Wire Schema
//!
//! One variant per protocol/op combination with a fixed field set. The
//! serialized keys match the cross-indexer table verbatim:
//!
//! | `p` | `op` | Fields |
//! |-----|------|--------|
//! | `drc-20` | deploy | `tick,max,lim?,dec?,burn?,func?` |
//! | `drc-20` | mint, transfer | `tick,amt` |
//! | `pair-v1` | create, add | `tick0,tick1,amt0,amt1,amt0_min,amt1_min` |
//! | `pair-v1` | remove | `tick0,tick1,liquidity` |
//! | `pair-v1` | swap | `tick0,tick1,amt0,amt1,amt1_min` |
//! | `wdoge` | deposit, withdraw | `tick,amt` |
//!
//! Every numeric field is a decimal string; conversion to integers happens
//! later, in the numeric layer, so a malformed amount is a verdict and not a
//! decode failure.

use serde::{Deserialize, Serialize};

use crate::entities::{Address, ChainLocation};
use crate::errors::WireError;

/// Protocol tag `drc-20`.
pub const PROTOCOL_DRC20: &str = "drc-20";
/// Protocol tag `pair-v1`.
pub const PROTOCOL_PAIR: &str = "pair-v1";
/// Protocol tag `wdoge`.
pub const PROTOCOL_WDOGE: &str = "wdoge";

/// Routing table of every supported `(p, op)` combination.
pub const SUPPORTED_OPERATIONS: &[(&str, &[&str])] = &[
    (PROTOCOL_DRC20, &["deploy", "mint", "transfer"]),
    (PROTOCOL_PAIR, &["create", "add", "remove", "swap"]),
    (PROTOCOL_WDOGE, &["deposit", "withdraw"]),
];

/// Returns true when `(protocol, op)` has a schema.
pub fn is_supported(protocol: &str, op: &str) -> bool {
    SUPPORTED_OPERATIONS
        .iter()
        .any(|(p, ops)| *p == protocol && ops.contains(&op))
}

/// A decoded inscription document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "p")]
pub enum Inscription {
    #[serde(rename = "drc-20")]
    Drc20(Drc20Op),
    #[serde(rename = "pair-v1")]
    Pair(PairOp),
    #[serde(rename = "wdoge")]
    Wdoge(WdogeOp),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Drc20Op {
    Deploy(Drc20Deploy),
    Mint(TickAmount),
    Transfer(TickAmount),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drc20Deploy {
    pub tick: String,
    pub max: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub func: Option<String>,
}

/// `tick,amt` body shared by drc-20 mint/transfer and wdoge deposit/withdraw.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickAmount {
    pub tick: String,
    pub amt: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PairOp {
    Create(PairLiquidity),
    Add(PairLiquidity),
    Remove(PairRemove),
    Swap(PairSwap),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairLiquidity {
    pub tick0: String,
    pub tick1: String,
    pub amt0: String,
    pub amt1: String,
    #[serde(default)]
    pub amt0_min: String,
    #[serde(default)]
    pub amt1_min: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairRemove {
    pub tick0: String,
    pub tick1: String,
    pub liquidity: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairSwap {
    pub tick0: String,
    pub tick1: String,
    pub amt0: String,
    #[serde(default)]
    pub amt1: String,
    #[serde(default)]
    pub amt1_min: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum WdogeOp {
    Deposit(TickAmount),
    Withdraw(TickAmount),
}

impl Inscription {
    /// Decode a JSON document, separating unknown `p`/`op` combinations from
    /// documents that are merely malformed.
    pub fn from_json(raw: &str) -> Result<Self, WireError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| WireError::Malformed(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, WireError> {
        let protocol = value.get("p").and_then(|v| v.as_str()).unwrap_or_default();
        let op = value.get("op").and_then(|v| v.as_str()).unwrap_or_default();
        if !is_supported(protocol, op) {
            return Err(WireError::UnsupportedOperation {
                protocol: protocol.to_string(),
                op: op.to_string(),
            });
        }
        serde_json::from_value(value).map_err(|e| WireError::Malformed(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, WireError> {
        serde_json::to_string(self).map_err(|e| WireError::Malformed(e.to_string()))
    }

    /// The `p` tag.
    pub fn protocol(&self) -> &'static str {
        match self {
            Self::Drc20(_) => PROTOCOL_DRC20,
            Self::Pair(_) => PROTOCOL_PAIR,
            Self::Wdoge(_) => PROTOCOL_WDOGE,
        }
    }

    /// The `op` tag.
    pub fn op(&self) -> &'static str {
        match self {
            Self::Drc20(Drc20Op::Deploy(_)) => "deploy",
            Self::Drc20(Drc20Op::Mint(_)) => "mint",
            Self::Drc20(Drc20Op::Transfer(_)) => "transfer",
            Self::Pair(PairOp::Create(_)) => "create",
            Self::Pair(PairOp::Add(_)) => "add",
            Self::Pair(PairOp::Remove(_)) => "remove",
            Self::Pair(PairOp::Swap(_)) => "swap",
            Self::Wdoge(WdogeOp::Deposit(_)) => "deposit",
            Self::Wdoge(WdogeOp::Withdraw(_)) => "withdraw",
        }
    }
}

fn default_repeat() -> u64 {
    1
}

/// An inscription together with the transaction context ingestion extracted
/// for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InscriptionEnvelope {
    pub location: ChainLocation,
    /// Address that inscribed the operation.
    pub sender: Address,
    /// Comma-separated recipient addresses.
    #[serde(default)]
    pub receivers: String,
    /// How many times the operation applies (mint fan-out).
    #[serde(default = "default_repeat")]
    pub repeat: u64,
    pub inscription: Inscription,
}

impl InscriptionEnvelope {
    pub fn new(location: ChainLocation, sender: Address, inscription: Inscription) -> Self {
        Self {
            location,
            sender,
            receivers: String::new(),
            repeat: default_repeat(),
            inscription,
        }
    }

    pub fn with_receivers(mut self, receivers: impl Into<String>) -> Self {
        self.receivers = receivers.into();
        self
    }

    pub fn with_repeat(mut self, repeat: u64) -> Self {
        self.repeat = repeat;
        self
    }

    /// Recipients split on commas, blanks dropped.
    pub fn recipients(&self) -> Vec<Address> {
        self.receivers
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Address::new)
            .collect()
    }
}

/// Envelope whose inscription has not been decoded yet.
///
/// Used at the ingestion edge so an unknown `p`/`op` becomes a per-operation
/// verdict instead of failing the whole input line.
#[derive(Clone, Debug, Deserialize)]
pub struct RawEnvelope {
    pub location: ChainLocation,
    pub sender: Address,
    #[serde(default)]
    pub receivers: String,
    #[serde(default = "default_repeat")]
    pub repeat: u64,
    pub inscription: serde_json::Value,
}

impl RawEnvelope {
    pub fn decode(self) -> Result<InscriptionEnvelope, WireError> {
        Ok(InscriptionEnvelope {
            location: self.location,
            sender: self.sender,
            receivers: self.receivers,
            repeat: self.repeat,
            inscription: Inscription::from_value(self.inscription)?,
        })
    }
}
