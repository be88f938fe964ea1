//! Chunked CSV export of transaction records.
//!
//! An export gathers every record matching the date window, measures the CSV
//! it would produce and then answers in one of three ways:
//!
//! 1. a specific part was asked for: that part's rows, with their own header;
//! 2. everything fits in one chunk: the whole document;
//! 3. otherwise: a [`Manifest`] describing the parts to fetch.
//!
//! CSV bodies are rendered completely before being handed back, so a failure
//! can never leave a truncated file behind.

use crate::{EngineError, RecordSource, ResultEngine, TransactionRecord};

mod codec;
mod estimate;
mod filter;
mod gather;
mod naming;
mod partition;

pub use codec::{COLUMN_COUNT, COLUMNS, UTF8_BOM, read_csv, write_csv};
pub use estimate::{estimate_bytes, estimate_header_bytes};
pub use filter::{DateWindow, FilterBound};
pub use gather::gather;
pub use naming::file_name;
pub use partition::{PartitionPlan, part_range};

/// Byte budget of one part (10 KiB).
pub const DEFAULT_CHUNK_LIMIT_BYTES: u64 = 10 * 1024;
/// Records requested per page from the record source.
pub const DEFAULT_PAGE_SIZE: u64 = 500;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportSettings {
    pub chunk_limit_bytes: u64,
    pub page_size: u64,
    /// Reject malformed `from`/`to` instead of ignoring them.
    pub strict_date_filters: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            chunk_limit_bytes: DEFAULT_CHUNK_LIMIT_BYTES,
            page_size: DEFAULT_PAGE_SIZE,
            strict_date_filters: false,
        }
    }
}

/// A parsed export request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportRequest {
    pub window: DateWindow,
    /// 1-based part index; validated against the plan at export time.
    pub part: Option<u64>,
    /// Prefix the CSV with a UTF-8 byte-order mark.
    pub excel: bool,
}

impl ExportRequest {
    /// Build a request from raw query values.
    ///
    /// Empty values count as absent. `part` must be an unsigned integer and
    /// `excel` is only enabled by the literal `"true"`.
    pub fn parse(
        from: Option<&str>,
        to: Option<&str>,
        part: Option<&str>,
        excel: Option<&str>,
        settings: &ExportSettings,
    ) -> ResultEngine<Self> {
        let window = DateWindow::parse(from, to, settings.strict_date_filters)?;
        let part = match part.map(str::trim).filter(|raw| !raw.is_empty()) {
            Some(raw) => Some(
                raw.parse::<u64>()
                    .map_err(|_| EngineError::InvalidPart(raw.to_string()))?,
            ),
            None => None,
        };
        Ok(Self {
            window,
            part,
            excel: excel == Some("true"),
        })
    }
}

/// A CSV document ready to be sent as an attachment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvFile {
    pub filename: String,
    pub num_parts: u64,
    /// Data rows in `body`, header excluded.
    pub rows: usize,
    pub body: Vec<u8>,
}

/// Description of a multi-part export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Manifest {
    pub window: DateWindow,
    pub excel: bool,
    pub num_parts: u64,
    pub total_bytes: u64,
    pub chunk_limit: u64,
}

impl Manifest {
    /// Query parameters that fetch `part`, keys in sorted order.
    pub fn part_query(&self, part: u64) -> Vec<(&'static str, String)> {
        let mut query = Vec::with_capacity(4);
        if self.excel {
            query.push(("excel", "true".to_string()));
        }
        if let Some(from) = self.window.from {
            query.push(("from", from.query_value()));
        }
        query.push(("part", part.to_string()));
        if let Some(to) = self.window.to {
            query.push(("to", to.query_value()));
        }
        query
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    File(CsvFile),
    Manifest(Manifest),
}

/// Run an export against `source`.
pub async fn export<S: RecordSource + ?Sized>(
    source: &S,
    request: &ExportRequest,
    settings: &ExportSettings,
) -> ResultEngine<ExportOutcome> {
    let rows = gather(source, &request.window, settings.page_size).await?;
    let total_bytes = estimate_bytes(&rows)?;
    let header_bytes = estimate_header_bytes()?;
    let plan = PartitionPlan::new(total_bytes, header_bytes, settings.chunk_limit_bytes);
    tracing::info!(
        "export of {} rows: {} bytes, {} part(s)",
        rows.len(),
        total_bytes,
        plan.num_parts
    );

    if let Some(part) = request.part {
        if !plan.contains_part(part) {
            return Err(EngineError::InvalidPart(part.to_string()));
        }
        let range = part_range(rows.len(), plan.num_parts, part);
        let filename = file_name(&request.window, Some((part, plan.num_parts)));
        return render(filename, plan.num_parts, &rows[range], request.excel)
            .map(ExportOutcome::File);
    }

    if plan.fits_single_file() {
        let filename = file_name(&request.window, None);
        return render(filename, plan.num_parts, &rows, request.excel).map(ExportOutcome::File);
    }

    Ok(ExportOutcome::Manifest(Manifest {
        window: request.window,
        excel: request.excel,
        num_parts: plan.num_parts,
        total_bytes,
        chunk_limit: settings.chunk_limit_bytes,
    }))
}

fn render(
    filename: String,
    num_parts: u64,
    rows: &[TransactionRecord],
    excel: bool,
) -> ResultEngine<CsvFile> {
    let mut body = Vec::new();
    if excel {
        body.extend_from_slice(&UTF8_BOM);
    }
    let body = write_csv(body, rows)?;
    Ok(CsvFile {
        filename,
        num_parts,
        rows: rows.len(),
        body,
    })
}
