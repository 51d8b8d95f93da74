//! drc-20 deploy / mint / transfer rules.

use shared_types::numeric::{narrow, widen_mul};
use shared_types::{TokenAmount, U512};

use super::{require_balance, require_positive, require_ticker_length, Shortfall};
use crate::domain::{Approval, OperationKind, RejectReason, TokenOperation, ValidationError};
use crate::ports::LedgerQuery;

pub struct TokenValidator<'a, L: LedgerQuery + ?Sized> {
    ledger: &'a L,
}

impl<'a, L: LedgerQuery + ?Sized> TokenValidator<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    pub fn validate(&self, op: &TokenOperation) -> Result<Approval, ValidationError> {
        match op.kind {
            OperationKind::Deploy => self.deploy(op),
            OperationKind::Mint => self.mint(op),
            OperationKind::Transfer => self.transfer(op),
            other => Err(ValidationError::reject_with(
                RejectReason::UnsupportedOperation,
                format!("{} is not a drc-20 operation", other.op_name()),
            )),
        }
    }

    /// Register a new ticker.
    ///
    /// Amounts above the numeric ceiling never reach this point; conversion
    /// rejects them with `ExceedsNumericCeiling`.
    pub fn deploy(&self, op: &TokenOperation) -> Result<Approval, ValidationError> {
        require_ticker_length(&op.ticker)?;
        require_positive(op.max_supply, RejectReason::NonPositiveMaxSupply, "max")?;
        require_positive(op.per_mint_limit, RejectReason::NonPositiveMintLimit, "lim")?;
        if op.per_mint_limit > op.max_supply {
            return Err(ValidationError::reject_with(
                RejectReason::LimitExceedsMaxSupply,
                format!("lim {} > max {}", op.per_mint_limit, op.max_supply),
            ));
        }
        if self.ledger.supply_info(&op.ticker)?.is_some() {
            return Err(ValidationError::reject_with(
                RejectReason::AlreadyDeployed,
                op.ticker.to_string(),
            ));
        }

        Ok(Approval::Deploy {
            ticker: op.ticker.clone(),
            max_supply: op.max_supply,
            per_mint_limit: op.per_mint_limit,
            decimals: op.decimals,
            deployer: op.sender_address.clone(),
        })
    }

    /// Mint `amount × repeat_count` to the recipient.
    pub fn mint(&self, op: &TokenOperation) -> Result<Approval, ValidationError> {
        require_ticker_length(&op.ticker)?;
        let Some(supply) = self.ledger.supply_info(&op.ticker)? else {
            return Err(ValidationError::reject_with(
                RejectReason::NotDeployed,
                op.ticker.to_string(),
            ));
        };
        require_positive(op.amount, RejectReason::NonPositiveAmount, "amt")?;
        if op.amount > supply.per_mint_limit {
            return Err(ValidationError::reject_with(
                RejectReason::ExceedsMintLimit,
                format!("amt {} > lim {}", op.amount, supply.per_mint_limit),
            ));
        }

        let total = widen_mul(op.amount, TokenAmount::from(op.repeat_count));
        let after = total + U512::from(supply.minted_sum);
        // Bounded by max_supply, so the narrowing below cannot fail
        let total = match narrow(total) {
            Some(total) if after <= U512::from(supply.max_supply) => total,
            _ => {
                return Err(ValidationError::reject_with(
                    RejectReason::ExceedsMaxSupply,
                    format!(
                        "minted {} + {} x {} > max {}",
                        supply.minted_sum, op.amount, op.repeat_count, supply.max_supply
                    ),
                ))
            }
        };

        Ok(Approval::Mint {
            ticker: op.ticker.clone(),
            recipient: op.mint_recipient().clone(),
            total,
        })
    }

    /// Send `amount` to every recipient out of one balance.
    pub fn transfer(&self, op: &TokenOperation) -> Result<Approval, ValidationError> {
        require_positive(op.amount, RejectReason::NonPositiveAmount, "amt")?;
        let recipients = op.recipient_address_list.len();
        if recipients == 0 {
            return Err(ValidationError::reject(RejectReason::MissingRecipient));
        }

        let required = widen_mul(op.amount, TokenAmount::from(recipients));
        let total = require_balance(
            self.ledger,
            &op.ticker,
            &op.sender_address,
            required,
            Shortfall::BALANCE,
        )?;

        Ok(Approval::Transfer {
            ticker: op.ticker.clone(),
            from: op.sender_address.clone(),
            recipients: op.recipient_address_list.clone(),
            amount_each: op.amount,
            total,
        })
    }
}
