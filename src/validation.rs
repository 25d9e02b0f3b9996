//! Input checks applied by the adapters (HTTP API, CSV import) before a
//! request reaches the service. The service itself trusts that these hold.

use rust_decimal::Decimal;

use crate::{NewTransaction, TransactionPatch};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

pub fn validate_new(new: &NewTransaction) -> Result<(), ValidationError> {
    check_account_id(&new.account_id)?;
    check_amount(new.amount)
}

/// Checks the fields present in `patch`. Absent fields are not validated.
pub fn validate_patch(patch: &TransactionPatch) -> Result<(), ValidationError> {
    if let Some(account_id) = &patch.account_id {
        check_account_id(account_id)?;
    }
    if let Some(amount) = patch.amount {
        check_amount(amount)?;
    }
    Ok(())
}

fn check_account_id(account_id: &str) -> Result<(), ValidationError> {
    if account_id.trim().is_empty() {
        return Err(ValidationError("Account ID cannot be blank".to_owned()));
    }
    Ok(())
}

fn check_amount(amount: Decimal) -> Result<(), ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError("Amount must be greater than 0".to_owned()));
    }
    Ok(())
}
