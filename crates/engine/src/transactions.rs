//! Transaction storage.
//!
//! Rows live in the `transactions` table. The export only ever reads them
//! through [`RecordSource`](crate::RecordSource); creation exists so the
//! table can be populated by the application and by tests.

use std::{io, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, entity::prelude::*,
};
use uuid::Uuid;

use crate::{
    Engine, EngineError, NewTransaction, RecordPage, ResultEngine, TransactionRecord,
    export::read_csv,
};

/// Outcome of [`Engine::import_csv`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub inserted: usize,
    /// Rows whose `transaction_id` was already stored.
    pub skipped: usize,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub transaction_id: String,
    pub no_ref: String,
    pub order_type_code: String,
    pub order_type_name: String,
    pub transaction_type_code: String,
    pub transaction_type_name: String,
    pub transaction_date: DateTimeUtc,
    pub from_account_number: String,
    pub from_account_name: String,
    pub from_account_product_name: String,
    pub to_account_number: String,
    pub to_account_name: String,
    pub to_account_product_name: String,
    /// Decimal text; SQLite has no exact decimal type.
    pub amount: String,
    pub status: String,
    pub description: String,
    pub method: String,
    pub currency: String,
    pub metadata: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for TransactionRecord {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let amount = Decimal::from_str(&model.amount).map_err(|_| {
            DbErr::Type(format!(
                "stored amount of {} is not a decimal: {}",
                model.transaction_id, model.amount
            ))
        })?;
        Ok(Self {
            transaction_id: model.transaction_id,
            no_ref: model.no_ref,
            order_type_code: model.order_type_code,
            order_type_name: model.order_type_name,
            transaction_type_code: model.transaction_type_code,
            transaction_type_name: model.transaction_type_name,
            transaction_date: model.transaction_date,
            from_account_number: model.from_account_number,
            from_account_name: model.from_account_name,
            from_account_product_name: model.from_account_product_name,
            to_account_number: model.to_account_number,
            to_account_name: model.to_account_name,
            to_account_product_name: model.to_account_product_name,
            amount,
            status: model.status,
            description: model.description,
            method: model.method,
            currency: model.currency,
            metadata: model.metadata,
        })
    }
}

fn active_model(tx: NewTransaction, transaction_id: String, now: DateTime<Utc>) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::NotSet,
        transaction_id: ActiveValue::Set(transaction_id),
        no_ref: ActiveValue::Set(tx.no_ref),
        order_type_code: ActiveValue::Set(tx.order_type_code),
        order_type_name: ActiveValue::Set(tx.order_type_name),
        transaction_type_code: ActiveValue::Set(tx.transaction_type_code),
        transaction_type_name: ActiveValue::Set(tx.transaction_type_name),
        transaction_date: ActiveValue::Set(tx.transaction_date),
        from_account_number: ActiveValue::Set(tx.from_account_number),
        from_account_name: ActiveValue::Set(tx.from_account_name),
        from_account_product_name: ActiveValue::Set(tx.from_account_product_name),
        to_account_number: ActiveValue::Set(tx.to_account_number),
        to_account_name: ActiveValue::Set(tx.to_account_name),
        to_account_product_name: ActiveValue::Set(tx.to_account_product_name),
        amount: ActiveValue::Set(tx.amount.to_string()),
        status: ActiveValue::Set(tx.status),
        description: ActiveValue::Set(tx.description),
        method: ActiveValue::Set(tx.method),
        currency: ActiveValue::Set(tx.currency.to_ascii_uppercase()),
        metadata: ActiveValue::Set(tx.metadata.unwrap_or_default()),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
        deleted_at: ActiveValue::Set(None),
    }
}

impl Engine {
    /// Validates and stores a new transaction.
    ///
    /// A missing `transaction_id` is generated; an existing one must be unique.
    pub async fn create_transaction(&self, tx: NewTransaction) -> ResultEngine<TransactionRecord> {
        self.validator.validate_new(&tx)?;

        let transaction_id = match tx.transaction_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        let existing = Entity::find()
            .filter(Column::TransactionId.eq(transaction_id.clone()))
            .one(&self.database)
            .await?;
        if existing.is_some() {
            return Err(EngineError::ExistingKey(transaction_id));
        }

        let model = active_model(tx, transaction_id, Utc::now())
            .insert(&self.database)
            .await?;
        TransactionRecord::try_from(model)
    }

    /// One page of live (not soft-deleted) transactions, newest first.
    ///
    /// `page` is 1-based; `total` counts every live row, not just this page.
    pub async fn list_transactions(&self, page: u64, size: u64) -> ResultEngine<RecordPage> {
        let page = page.max(1);
        let live = Entity::find().filter(Column::DeletedAt.is_null());

        let total = live.clone().count(&self.database).await?;
        let models = live
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .offset((page - 1).saturating_mul(size))
            .limit(size)
            .all(&self.database)
            .await?;

        let records = models
            .into_iter()
            .map(TransactionRecord::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        Ok(RecordPage {
            records,
            page,
            total,
        })
    }

    /// Live transactions whose `transaction_date` lies in `[from, to]`, oldest first.
    ///
    /// A missing bound leaves that side open.
    pub async fn list_transactions_by_date_range(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> ResultEngine<Vec<TransactionRecord>> {
        let mut query = Entity::find().filter(Column::DeletedAt.is_null());
        if let Some(from) = from {
            query = query.filter(Column::TransactionDate.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(Column::TransactionDate.lte(to));
        }

        query
            .order_by_asc(Column::TransactionDate)
            .order_by_asc(Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(TransactionRecord::try_from)
            .collect()
    }

    /// Load a CSV document in export format into the store.
    ///
    /// Rows already present (same `transaction_id`) are skipped, so importing
    /// the same file twice is harmless. Any other failure stops the import;
    /// rows inserted before it stay.
    pub async fn import_csv<R: io::Read>(&self, source: R) -> ResultEngine<ImportReport> {
        let rows = read_csv(source)?;
        let mut report = ImportReport::default();

        for row in rows {
            match self.create_transaction(row.into()).await {
                Ok(_) => report.inserted += 1,
                Err(EngineError::ExistingKey(id)) => {
                    tracing::debug!("import: {id} already stored");
                    report.skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }

        tracing::info!(
            "imported {} transactions, skipped {}",
            report.inserted,
            report.skipped
        );
        Ok(report)
    }
}
