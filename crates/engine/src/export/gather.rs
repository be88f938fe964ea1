use crate::{RecordSource, ResultEngine, TransactionRecord};

use super::filter::DateWindow;

/// Collect every record of `source` inside `window`, in source order.
///
/// Pages of `page_size` are requested until a short page comes back or the
/// pages requested so far cover the reported total. Filtering never stops
/// the paging early. Any failing page aborts the whole gather.
pub async fn gather<S: RecordSource + ?Sized>(
    source: &S,
    window: &DateWindow,
    page_size: u64,
) -> ResultEngine<Vec<TransactionRecord>> {
    let page_size = page_size.max(1);
    let mut page = 1u64;
    let mut out = Vec::new();

    loop {
        let batch = source.list_page(page, page_size).await?;
        let fetched = batch.records.len() as u64;
        tracing::debug!(
            "export page {page}: {fetched} records, {} reported in total",
            batch.total
        );

        out.extend(
            batch
                .records
                .into_iter()
                .filter(|record| window.contains(record.transaction_date)),
        );

        if fetched < page_size || page.saturating_mul(page_size) >= batch.total {
            break;
        }
        page += 1;
    }

    Ok(out)
}
