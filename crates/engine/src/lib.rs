use sea_orm::DatabaseConnection;

pub use error::EngineError;
pub use export::{
    CsvFile, DateWindow, ExportOutcome, ExportRequest, ExportSettings, FilterBound, Manifest,
    PartitionPlan,
};
pub use record::{NewTransaction, TransactionRecord};
pub use source::{RecordPage, RecordSource};
pub use transactions::ImportReport;
pub use validation::TransactionValidator;

mod error;
pub mod export;
mod record;
mod source;
mod transactions;
mod validation;

type ResultEngine<T> = Result<T, EngineError>;

/// Owns the database handle behind the transaction store and the export.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    validator: TransactionValidator,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Run an export with the engine's own store as the record source.
    pub async fn export(
        &self,
        request: &ExportRequest,
        settings: &ExportSettings,
    ) -> ResultEngine<ExportOutcome> {
        export::export(self, request, settings).await
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            validator: TransactionValidator::new(),
        })
    }
}
