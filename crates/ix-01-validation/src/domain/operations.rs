//! # Decoded Operations
//!
//! Typed operations built once per inscription from the wire schema. Raw
//! string fields go through the numeric layer here; validators only ever
//! see integers and normalized tickers.
//!
//! An operation is never mutated after conversion.

use serde::{Deserialize, Serialize};
use shared_types::numeric::{narrow, parse_decimals, MAX_AMOUNT};
use shared_types::wire::{Drc20Op, PairOp, WdogeOp, PROTOCOL_DRC20, PROTOCOL_PAIR, PROTOCOL_WDOGE};
use shared_types::{
    apply_default_decimals, parse_amount, parse_bound, sort_token_pair, Address, AmountBound,
    ChainLocation, Inscription, InscriptionEnvelope, NumericError, PoolKey, Ticker, TokenAmount,
};

use super::errors::{RejectReason, Rejection};

/// Every `(protocol, op)` combination the dispatcher can route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Deploy,
    Mint,
    Transfer,
    Create,
    Add,
    Remove,
    Swap,
    Deposit,
    Withdraw,
}

impl OperationKind {
    /// Resolve a protocol tag and operation name.
    pub fn route(protocol: &str, op: &str) -> Result<Self, Rejection> {
        let kind = match (protocol, op) {
            (PROTOCOL_DRC20, "deploy") => Self::Deploy,
            (PROTOCOL_DRC20, "mint") => Self::Mint,
            (PROTOCOL_DRC20, "transfer") => Self::Transfer,
            (PROTOCOL_PAIR, "create") => Self::Create,
            (PROTOCOL_PAIR, "add") => Self::Add,
            (PROTOCOL_PAIR, "remove") => Self::Remove,
            (PROTOCOL_PAIR, "swap") => Self::Swap,
            (PROTOCOL_WDOGE, "deposit") => Self::Deposit,
            (PROTOCOL_WDOGE, "withdraw") => Self::Withdraw,
            _ => {
                return Err(Rejection::with_detail(
                    RejectReason::UnsupportedOperation,
                    format!("p={protocol} op={op}"),
                ))
            }
        };
        Ok(kind)
    }

    pub fn protocol(&self) -> &'static str {
        match self {
            Self::Deploy | Self::Mint | Self::Transfer => PROTOCOL_DRC20,
            Self::Create | Self::Add | Self::Remove | Self::Swap => PROTOCOL_PAIR,
            Self::Deposit | Self::Withdraw => PROTOCOL_WDOGE,
        }
    }

    pub fn op_name(&self) -> &'static str {
        match self {
            Self::Deploy => "deploy",
            Self::Mint => "mint",
            Self::Transfer => "transfer",
            Self::Create => "create",
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Swap => "swap",
            Self::Deposit => "deposit",
            Self::Withdraw => "withdraw",
        }
    }
}

/// drc-20 deploy / mint / transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenOperation {
    pub kind: OperationKind,
    pub ticker: Ticker,
    pub decimals: u8,
    pub max_supply: TokenAmount,
    pub per_mint_limit: TokenAmount,
    pub amount: TokenAmount,
    pub burn_policy: Option<String>,
    pub func_policy: Option<String>,
    pub sender_address: Address,
    pub recipient_address_list: Vec<Address>,
    pub repeat_count: u64,
}

impl TokenOperation {
    /// Address a mint credits: first recipient, else the inscriber.
    pub fn mint_recipient(&self) -> &Address {
        self.recipient_address_list
            .first()
            .unwrap_or(&self.sender_address)
    }
}

/// pair-v1 create / add / remove / swap.
///
/// For create/add/remove the pair is canonical (`ticker_a < ticker_b`) and
/// the paired amounts/minimums follow it. A swap keeps the caller's
/// direction: `ticker_a` is given, `ticker_b` is received.
///
/// Minimums are only ever compared, so they keep their full magnitude.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOperation {
    pub kind: OperationKind,
    pub ticker_a: Ticker,
    pub ticker_b: Ticker,
    pub amount_a: TokenAmount,
    pub amount_b: TokenAmount,
    pub amount_a_min: AmountBound,
    pub amount_b_min: AmountBound,
    pub liquidity_amount: TokenAmount,
    pub holder_address: Address,
}

impl SwapOperation {
    pub fn pool_key(&self) -> PoolKey {
        PoolKey::new(self.ticker_a.clone(), self.ticker_b.clone())
    }
}

/// wdoge deposit / withdraw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeOperation {
    pub kind: OperationKind,
    pub ticker: Ticker,
    pub amount: TokenAmount,
    pub holder_address: Address,
}

/// A converted operation ready for exactly one validator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Token(TokenOperation),
    Swap(SwapOperation),
    Bridge(BridgeOperation),
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Token(op) => op.kind,
            Self::Swap(op) => op.kind,
            Self::Bridge(op) => op.kind,
        }
    }

    /// Convert an envelope, parsing every amount through the numeric layer.
    pub fn from_envelope(envelope: &InscriptionEnvelope) -> Result<Self, Rejection> {
        let sender = envelope.sender.clone();
        match &envelope.inscription {
            Inscription::Drc20(op) => token_operation(op, envelope).map(Self::Token),
            Inscription::Pair(op) => swap_operation(op, sender).map(Self::Swap),
            Inscription::Wdoge(op) => bridge_operation(op, sender).map(Self::Bridge),
        }
    }
}

/// Conversion paired with its chain position, the unit ingestion schedules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedOperation {
    pub location: ChainLocation,
    pub operation: Operation,
}

fn field(name: &str, raw: &str) -> Result<TokenAmount, Rejection> {
    parse_amount(raw).map_err(|e| {
        let reason = match e {
            NumericError::AmountOverflow(_) => RejectReason::ExceedsNumericCeiling,
            _ => RejectReason::InvalidAmount,
        };
        Rejection::with_detail(reason, format!("{name}: {e}"))
    })
}

fn bound_field(name: &str, raw: &str) -> Result<AmountBound, Rejection> {
    parse_bound(raw)
        .map_err(|e| Rejection::with_detail(RejectReason::InvalidAmount, format!("{name}: {e}")))
}

fn token_operation(op: &Drc20Op, envelope: &InscriptionEnvelope) -> Result<TokenOperation, Rejection> {
    let mut out = TokenOperation {
        kind: OperationKind::Deploy,
        ticker: Ticker::new(""),
        decimals: apply_default_decimals(0),
        max_supply: TokenAmount::zero(),
        per_mint_limit: TokenAmount::zero(),
        amount: TokenAmount::zero(),
        burn_policy: None,
        func_policy: None,
        sender_address: envelope.sender.clone(),
        recipient_address_list: envelope.recipients(),
        repeat_count: envelope.repeat.max(1),
    };

    match op {
        Drc20Op::Deploy(body) => {
            out.ticker = Ticker::new(&body.tick);
            out.max_supply = field("max", &body.max)?;
            // An absent `lim` lets a single mint reach `max`
            out.per_mint_limit = match body.lim.as_deref() {
                None | Some("") => out.max_supply,
                Some(raw) => field("lim", raw)?,
            };
            out.decimals = apply_default_decimals(parse_decimals(body.dec.as_deref())?);
            out.burn_policy = body.burn.clone();
            out.func_policy = body.func.clone();
        }
        Drc20Op::Mint(body) => {
            out.kind = OperationKind::Mint;
            out.ticker = Ticker::new(&body.tick);
            out.amount = field("amt", &body.amt)?;
        }
        Drc20Op::Transfer(body) => {
            out.kind = OperationKind::Transfer;
            out.ticker = Ticker::new(&body.tick);
            out.amount = field("amt", &body.amt)?;
        }
    }
    Ok(out)
}

fn swap_operation(op: &PairOp, holder: Address) -> Result<SwapOperation, Rejection> {
    let (kind, tick0, tick1, amt0, amt1, amt0_min, amt1_min, liquidity) = match op {
        PairOp::Create(b) | PairOp::Add(b) => {
            let kind = if matches!(op, PairOp::Create(_)) {
                OperationKind::Create
            } else {
                OperationKind::Add
            };
            (
                kind,
                &b.tick0,
                &b.tick1,
                field("amt0", &b.amt0)?,
                field("amt1", &b.amt1)?,
                bound_field("amt0_min", &b.amt0_min)?,
                bound_field("amt1_min", &b.amt1_min)?,
                TokenAmount::zero(),
            )
        }
        PairOp::Remove(b) => (
            OperationKind::Remove,
            &b.tick0,
            &b.tick1,
            TokenAmount::zero(),
            TokenAmount::zero(),
            AmountBound::zero(),
            AmountBound::zero(),
            field("liquidity", &b.liquidity)?,
        ),
        PairOp::Swap(b) => {
            // Direction matters for a swap, so the pair is left as given
            return Ok(SwapOperation {
                kind: OperationKind::Swap,
                ticker_a: Ticker::new(&b.tick0),
                ticker_b: Ticker::new(&b.tick1),
                amount_a: field("amt0", &b.amt0)?,
                // No swap rule reads amt1; only its syntax is checked
                amount_b: narrow(bound_field("amt1", &b.amt1)?).unwrap_or(MAX_AMOUNT),
                amount_a_min: AmountBound::zero(),
                amount_b_min: bound_field("amt1_min", &b.amt1_min)?,
                liquidity_amount: TokenAmount::zero(),
                holder_address: holder,
            });
        }
    };

    let sorted = sort_token_pair(
        Ticker::new(tick0),
        Ticker::new(tick1),
        amt0,
        amt1,
        amt0_min,
        amt1_min,
    );
    Ok(SwapOperation {
        kind,
        ticker_a: sorted.ticker_a,
        ticker_b: sorted.ticker_b,
        amount_a: sorted.amount_a,
        amount_b: sorted.amount_b,
        amount_a_min: sorted.amount_a_min,
        amount_b_min: sorted.amount_b_min,
        liquidity_amount: liquidity,
        holder_address: holder,
    })
}

fn bridge_operation(op: &WdogeOp, holder: Address) -> Result<BridgeOperation, Rejection> {
    let (kind, body) = match op {
        WdogeOp::Deposit(b) => (OperationKind::Deposit, b),
        WdogeOp::Withdraw(b) => (OperationKind::Withdraw, b),
    };
    Ok(BridgeOperation {
        kind,
        ticker: Ticker::new(&body.tick),
        amount: field("amt", &body.amt)?,
        holder_address: holder,
    })
}
