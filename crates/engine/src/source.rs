//! Paginated access to transaction records.

use std::future::Future;

use crate::{Engine, ResultEngine, TransactionRecord};

/// One page returned by a [`RecordSource`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordPage {
    pub records: Vec<TransactionRecord>,
    /// The 1-based page the source actually served.
    pub page: u64,
    /// Number of records the source holds in total.
    pub total: u64,
}

/// Anything that can serve transaction records page by page.
///
/// The export does not care how pages are backed: the engine's database
/// store, an in-memory fixture, or a remote service all qualify.
pub trait RecordSource {
    /// Fetch page `page` (1-based) holding at most `size` records.
    fn list_page(&self, page: u64, size: u64)
    -> impl Future<Output = ResultEngine<RecordPage>> + Send;
}

impl RecordSource for Engine {
    async fn list_page(&self, page: u64, size: u64) -> ResultEngine<RecordPage> {
        self.list_transactions(page, size).await
    }
}
