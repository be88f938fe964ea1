//! Input validation for new transactions.
//!
//! [`TransactionValidator`] carries no state; the engine builds one and hands
//! it out by reference, so callers never depend on a process-wide instance.

use rust_decimal::Decimal;

use crate::{EngineError, NewTransaction, ResultEngine};

const STATUSES: [&str; 3] = ["PENDING", "SUCCESS", "FAILED"];
const MAX_DESCRIPTION_CHARS: usize = 255;

#[derive(Clone, Copy, Debug, Default)]
pub struct TransactionValidator;

impl TransactionValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check a create request, returning the first violation found.
    pub fn validate_new(&self, tx: &NewTransaction) -> ResultEngine<()> {
        let required = [
            ("order_type_code", &tx.order_type_code),
            ("order_type_name", &tx.order_type_name),
            ("transaction_type_code", &tx.transaction_type_code),
            ("transaction_type_name", &tx.transaction_type_name),
            ("from_account_number", &tx.from_account_number),
            ("from_account_name", &tx.from_account_name),
            ("from_account_product_name", &tx.from_account_product_name),
            ("to_account_number", &tx.to_account_number),
            ("to_account_name", &tx.to_account_name),
            ("to_account_product_name", &tx.to_account_product_name),
            ("method", &tx.method),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(EngineError::InvalidTransaction(format!(
                    "{field} must not be empty"
                )));
            }
        }

        if tx.amount <= Decimal::ZERO {
            return Err(EngineError::InvalidTransaction(
                "amount must be > 0".to_string(),
            ));
        }
        if !STATUSES.contains(&tx.status.as_str()) {
            return Err(EngineError::InvalidTransaction(format!(
                "status must be one of {}",
                STATUSES.join(", ")
            )));
        }
        if tx.description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(EngineError::InvalidTransaction(format!(
                "description must be at most {MAX_DESCRIPTION_CHARS} characters"
            )));
        }
        if tx.currency.len() != 3 || !tx.currency.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(EngineError::InvalidTransaction(format!(
                "invalid currency: {}",
                tx.currency
            )));
        }
        if let Some(metadata) = tx.metadata.as_deref()
            && !metadata.trim().is_empty()
            && serde_json::from_str::<serde_json::Value>(metadata).is_err()
        {
            return Err(EngineError::InvalidTransaction(
                "metadata must be valid JSON".to_string(),
            ));
        }
        Ok(())
    }
}
