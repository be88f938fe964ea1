//! Transaction records as the export sees them.
//!
//! A [`TransactionRecord`] is the read-only projection of a stored
//! transaction: exactly the 19 columns that end up in a CSV row, in the same
//! order as the header.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: String,
    pub no_ref: String,
    pub order_type_code: String,
    pub order_type_name: String,
    pub transaction_type_code: String,
    pub transaction_type_name: String,
    pub transaction_date: DateTime<Utc>,
    pub from_account_number: String,
    pub from_account_name: String,
    pub from_account_product_name: String,
    pub to_account_number: String,
    pub to_account_name: String,
    pub to_account_product_name: String,
    /// Keeps its scale: `10.50` is stored and exported as `10.50`.
    pub amount: Decimal,
    pub status: String,
    pub description: String,
    pub method: String,
    /// ISO 4217 code, three letters.
    pub currency: String,
    /// Raw JSON text, embedded verbatim in the CSV. Empty when absent.
    pub metadata: String,
}

/// Input for [`Engine::create_transaction`](crate::Engine::create_transaction).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Generated (UUID v4) when absent or blank.
    pub transaction_id: Option<String>,
    pub no_ref: String,
    pub order_type_code: String,
    pub order_type_name: String,
    pub transaction_type_code: String,
    pub transaction_type_name: String,
    pub transaction_date: DateTime<Utc>,
    pub from_account_number: String,
    pub from_account_name: String,
    pub from_account_product_name: String,
    pub to_account_number: String,
    pub to_account_name: String,
    pub to_account_product_name: String,
    pub amount: Decimal,
    pub status: String,
    pub description: String,
    pub method: String,
    pub currency: String,
    pub metadata: Option<String>,
}

impl From<TransactionRecord> for NewTransaction {
    fn from(record: TransactionRecord) -> Self {
        Self {
            transaction_id: Some(record.transaction_id),
            no_ref: record.no_ref,
            order_type_code: record.order_type_code,
            order_type_name: record.order_type_name,
            transaction_type_code: record.transaction_type_code,
            transaction_type_name: record.transaction_type_name,
            transaction_date: record.transaction_date,
            from_account_number: record.from_account_number,
            from_account_name: record.from_account_name,
            from_account_product_name: record.from_account_product_name,
            to_account_number: record.to_account_number,
            to_account_name: record.to_account_name,
            to_account_product_name: record.to_account_product_name,
            amount: record.amount,
            status: record.status,
            description: record.description,
            method: record.method,
            currency: record.currency,
            metadata: Some(record.metadata).filter(|m| !m.is_empty()),
        }
    }
}
