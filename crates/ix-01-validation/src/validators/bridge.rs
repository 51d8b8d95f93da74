//! wdoge deposit / withdraw rules.

use super::{require_balance, require_positive, Shortfall};
use crate::config::ValidatorConfig;
use crate::domain::{Approval, BridgeOperation, OperationKind, RejectReason, ValidationError};
use crate::ports::LedgerQuery;

pub struct BridgeValidator<'a, L: LedgerQuery + ?Sized> {
    ledger: &'a L,
    config: &'a ValidatorConfig,
}

impl<'a, L: LedgerQuery + ?Sized> BridgeValidator<'a, L> {
    pub fn new(ledger: &'a L, config: &'a ValidatorConfig) -> Self {
        Self { ledger, config }
    }

    pub fn validate(&self, op: &BridgeOperation) -> Result<Approval, ValidationError> {
        if !op.ticker.is_wrapped() {
            return Err(ValidationError::reject_with(
                RejectReason::InvalidTicker,
                op.ticker.to_string(),
            ));
        }
        match op.kind {
            OperationKind::Deposit => self.deposit(op),
            OperationKind::Withdraw => self.withdraw(op),
            other => Err(ValidationError::reject_with(
                RejectReason::UnsupportedOperation,
                format!("{} is not a wdoge operation", other.op_name()),
            )),
        }
    }

    pub fn deposit(&self, op: &BridgeOperation) -> Result<Approval, ValidationError> {
        require_positive(op.amount, RejectReason::NonPositiveAmount, "amt")?;
        Ok(Approval::Deposit {
            holder: op.holder_address.clone(),
            amount: op.amount,
        })
    }

    /// Accepted as-is unless `enforce_withdraw_balance` is set, in which case
    /// it follows the transfer balance rule.
    pub fn withdraw(&self, op: &BridgeOperation) -> Result<Approval, ValidationError> {
        if self.config.enforce_withdraw_balance {
            require_balance(
                self.ledger,
                &op.ticker,
                &op.holder_address,
                op.amount.into(),
                Shortfall::BALANCE,
            )?;
        }
        Ok(Approval::Withdraw {
            holder: op.holder_address.clone(),
            amount: op.amount,
        })
    }
}
