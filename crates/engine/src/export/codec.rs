//! CSV encoding of [`TransactionRecord`]s.
//!
//! The header ([`COLUMNS`]) and each row ([`TransactionRecord::csv_fields`])
//! are both `[_; COLUMN_COUNT]` arrays, and both the real output and the
//! size estimate go through [`write_csv`], so the two can never disagree.

use std::{io, str::FromStr};

use chrono::{DateTime, SecondsFormat, Utc};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use rust_decimal::Decimal;

use crate::{EngineError, ResultEngine, TransactionRecord};

pub const COLUMN_COUNT: usize = 19;

pub const COLUMNS: [&str; COLUMN_COUNT] = [
    "Transaction ID",
    "No Ref",
    "Order Type Code",
    "Order Type Name",
    "Transaction Type Code",
    "Transaction Type Name",
    "Transaction Date",
    "From Account Number",
    "From Account Name",
    "From Account Product Name",
    "To Account Number",
    "To Account Name",
    "To Account Product Name",
    "Amount",
    "Status",
    "Description",
    "Method",
    "Currency",
    "Metadata",
];

/// UTF-8 byte-order mark, written ahead of the header for spreadsheet apps.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

impl TransactionRecord {
    /// The row as written to CSV, in [`COLUMNS`] order.
    pub fn csv_fields(&self) -> [String; COLUMN_COUNT] {
        [
            self.transaction_id.clone(),
            self.no_ref.clone(),
            self.order_type_code.clone(),
            self.order_type_name.clone(),
            self.transaction_type_code.clone(),
            self.transaction_type_name.clone(),
            self.transaction_date
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            self.from_account_number.clone(),
            self.from_account_name.clone(),
            self.from_account_product_name.clone(),
            self.to_account_number.clone(),
            self.to_account_name.clone(),
            self.to_account_product_name.clone(),
            self.amount.to_string(),
            self.status.clone(),
            self.description.clone(),
            self.method.clone(),
            self.currency.clone(),
            self.metadata.clone(),
        ]
    }

    fn from_csv_fields(line: u64, record: &StringRecord) -> ResultEngine<Self> {
        if record.len() != COLUMN_COUNT {
            return Err(EngineError::InvalidCsv(format!(
                "line {line}: expected {COLUMN_COUNT} fields, got {}",
                record.len()
            )));
        }
        let field = |idx: usize| record.get(idx).unwrap_or_default().to_string();

        let transaction_date = DateTime::parse_from_rfc3339(&record[6])
            .map_err(|_| {
                EngineError::InvalidCsv(format!("line {line}: invalid transaction date"))
            })?
            .with_timezone(&Utc);
        let amount = Decimal::from_str(&record[13])
            .map_err(|_| EngineError::InvalidCsv(format!("line {line}: invalid amount")))?;

        Ok(Self {
            transaction_id: field(0),
            no_ref: field(1),
            order_type_code: field(2),
            order_type_name: field(3),
            transaction_type_code: field(4),
            transaction_type_name: field(5),
            transaction_date,
            from_account_number: field(7),
            from_account_name: field(8),
            from_account_product_name: field(9),
            to_account_number: field(10),
            to_account_name: field(11),
            to_account_product_name: field(12),
            amount,
            status: field(14),
            description: field(15),
            method: field(16),
            currency: field(17),
            metadata: field(18),
        })
    }
}

/// Write the header followed by `rows` into `sink`, returning the sink.
///
/// An empty `rows` still produces the header line.
pub fn write_csv<W: io::Write>(sink: W, rows: &[TransactionRecord]) -> ResultEngine<W> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(sink);
    writer.write_record(COLUMNS)?;
    for row in rows {
        writer.write_record(row.csv_fields())?;
    }
    writer.flush()?;
    writer.into_inner().map_err(|err| err.into_error().into())
}

/// Parse a document produced by [`write_csv`], tolerating a leading BOM.
pub fn read_csv<R: io::Read>(source: R) -> ResultEngine<Vec<TransactionRecord>> {
    let mut reader = ReaderBuilder::new().has_headers(false).from_reader(source);
    let mut records = reader.records();

    let header = records
        .next()
        .ok_or_else(|| EngineError::InvalidCsv("missing header".to_string()))??;
    let header_matches = header.len() == COLUMN_COUNT
        && header
            .iter()
            .enumerate()
            .all(|(idx, name)| strip_bom(idx, name) == COLUMNS[idx]);
    if !header_matches {
        return Err(EngineError::InvalidCsv("unexpected header".to_string()));
    }

    records
        .enumerate()
        .map(|(idx, record)| TransactionRecord::from_csv_fields(idx as u64 + 2, &record?))
        .collect()
}

fn strip_bom(idx: usize, name: &str) -> &str {
    if idx == 0 {
        name.trim_start_matches('\u{feff}')
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn record(id: &str, description: &str) -> TransactionRecord {
        TransactionRecord {
            transaction_id: id.to_string(),
            no_ref: "REF-1".to_string(),
            order_type_code: "OT1".to_string(),
            order_type_name: "Transfer".to_string(),
            transaction_type_code: "TT1".to_string(),
            transaction_type_name: "Outgoing".to_string(),
            transaction_date: Utc.with_ymd_and_hms(2024, 3, 5, 8, 30, 0).unwrap(),
            from_account_number: "100".to_string(),
            from_account_name: "Alice".to_string(),
            from_account_product_name: "Savings".to_string(),
            to_account_number: "200".to_string(),
            to_account_name: "Bob".to_string(),
            to_account_product_name: "Current".to_string(),
            amount: Decimal::new(150000, 2),
            status: "SUCCESS".to_string(),
            description: description.to_string(),
            method: "BANK_TRANSFER".to_string(),
            currency: "IDR".to_string(),
            metadata: r#"{"channel":"web","tags":["a","b"]}"#.to_string(),
        }
    }

    #[test]
    fn header_is_a_single_plain_line() {
        let out = write_csv(Vec::new(), &[]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, format!("{}\n", COLUMNS.join(",")));
    }

    #[test]
    fn row_keeps_amount_scale_and_utc_timestamp() {
        let out = write_csv(Vec::new(), &[record("tx-1", "lunch")]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.starts_with("tx-1,REF-1,OT1,Transfer,TT1,Outgoing,2024-03-05T08:30:00Z,"));
        assert!(row.contains(",1500.00,SUCCESS,lunch,"));
        assert!(row.ends_with(r#","{""channel"":""web"",""tags"":[""a"",""b""]}""#));
    }

    #[test]
    fn quoting_is_applied_to_delimiters_and_newlines() {
        let out = write_csv(Vec::new(), &[record("tx-1", "rent, march\nsecond line")]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"rent, march\nsecond line\""));
    }

    #[test]
    fn read_back_restores_records_in_order() {
        let rows = vec![
            record("tx-1", "plain"),
            record("tx-2", "with \"quotes\", commas\nand newlines"),
        ];
        let mut bytes = UTF8_BOM.to_vec();
        bytes = write_csv(bytes, &rows).unwrap();

        assert_eq!(read_csv(bytes.as_slice()).unwrap(), rows);
    }

    #[test]
    fn read_rejects_foreign_header() {
        let err = read_csv("a,b,c\n1,2,3\n".as_bytes()).unwrap_err();
        assert_eq!(err, EngineError::InvalidCsv("unexpected header".to_string()));
    }
}
