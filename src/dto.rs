use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer,
}

/// A stored transaction record.
///
/// `id`, `account_id` and `timestamp` are fixed once the record has been
/// created; only [`Transaction::apply`] mutates a record, and it only
/// touches the amount, type and description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub description: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Builds the record for `new` under `id`, stamping the creation time.
    pub fn new(id: String, new: NewTransaction) -> Self {
        Self {
            id,
            account_id: new.account_id,
            amount: new.amount,
            tx_type: new.tx_type,
            description: new.description,
            timestamp: Utc::now(),
        }
    }

    /// Merges the supplied fields of `patch` into this record.
    /// Absent fields keep their current value. The account ID in the patch
    /// is ignored here, the service rejects any change to it beforehand.
    pub fn apply(&mut self, patch: TransactionPatch) {
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(tx_type) = patch.tx_type {
            self.tx_type = tx_type;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
    }
}

/// Input for creating a transaction. Also the row format of CSV imports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(
        default,
        deserialize_with = "deserialize_blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub account_id: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewTransaction {
    pub fn new(account_id: impl Into<String>, amount: Decimal, tx_type: TransactionType) -> Self {
        Self {
            id: None,
            account_id: account_id.into(),
            amount,
            tx_type,
            description: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update of a transaction. Only the fields that are present are
/// written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub tx_type: Option<TransactionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Treats a blank identifier the same as a missing one, so such records get
/// a generated ID.
fn deserialize_blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|opt| opt.filter(|id| !is_blank_id(id)))
}

/// Empty and whitespace-only identifiers count as missing.
pub(crate) fn is_blank_id(id: &str) -> bool {
    id.trim().is_empty()
}
