//! # Approvals
//!
//! What an accepted operation is allowed to do to the ledger. Storage applies
//! the approval rather than the raw operation, so the amounts that were
//! checked are exactly the amounts that get written (add-liquidity's chosen
//! pair, swap output, mint total).

use serde::{Deserialize, Serialize};
use shared_types::numeric::serde_decimal;
use shared_types::{Address, PoolKey, Ticker, TokenAmount};

use super::operations::OperationKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Approval {
    Deploy {
        ticker: Ticker,
        #[serde(with = "serde_decimal")]
        max_supply: TokenAmount,
        #[serde(with = "serde_decimal")]
        per_mint_limit: TokenAmount,
        decimals: u8,
        deployer: Address,
    },
    Mint {
        ticker: Ticker,
        recipient: Address,
        /// `amt × repeat_count`
        #[serde(with = "serde_decimal")]
        total: TokenAmount,
    },
    Transfer {
        ticker: Ticker,
        from: Address,
        recipients: Vec<Address>,
        /// Credited to each recipient.
        #[serde(with = "serde_decimal")]
        amount_each: TokenAmount,
        /// Debited from the sender.
        #[serde(with = "serde_decimal")]
        total: TokenAmount,
    },
    CreatePool {
        key: PoolKey,
        holder: Address,
        #[serde(with = "serde_decimal")]
        amount_a: TokenAmount,
        #[serde(with = "serde_decimal")]
        amount_b: TokenAmount,
    },
    AddLiquidity {
        key: PoolKey,
        holder: Address,
        /// Chosen by the optimal-amount search, not the caller's maximums.
        #[serde(with = "serde_decimal")]
        amount_a: TokenAmount,
        #[serde(with = "serde_decimal")]
        amount_b: TokenAmount,
        first_liquidity: bool,
    },
    RemoveLiquidity {
        key: PoolKey,
        holder: Address,
        #[serde(with = "serde_decimal")]
        liquidity: TokenAmount,
    },
    Swap {
        key: PoolKey,
        holder: Address,
        ticker_in: Ticker,
        ticker_out: Ticker,
        #[serde(with = "serde_decimal")]
        amount_in: TokenAmount,
        #[serde(with = "serde_decimal")]
        fee: TokenAmount,
        #[serde(with = "serde_decimal")]
        amount_out: TokenAmount,
        reserves_owner: Address,
    },
    Deposit {
        holder: Address,
        #[serde(with = "serde_decimal")]
        amount: TokenAmount,
    },
    Withdraw {
        holder: Address,
        #[serde(with = "serde_decimal")]
        amount: TokenAmount,
    },
}

impl Approval {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Deploy { .. } => OperationKind::Deploy,
            Self::Mint { .. } => OperationKind::Mint,
            Self::Transfer { .. } => OperationKind::Transfer,
            Self::CreatePool { .. } => OperationKind::Create,
            Self::AddLiquidity { .. } => OperationKind::Add,
            Self::RemoveLiquidity { .. } => OperationKind::Remove,
            Self::Swap { .. } => OperationKind::Swap,
            Self::Deposit { .. } => OperationKind::Deposit,
            Self::Withdraw { .. } => OperationKind::Withdraw,
        }
    }
}
