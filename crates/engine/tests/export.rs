use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::DbErr;

use engine::export::{self, COLUMNS, UTF8_BOM, estimate_bytes, estimate_header_bytes, read_csv};
use engine::{
    EngineError, ExportOutcome, ExportRequest, ExportSettings, RecordPage, RecordSource,
    TransactionRecord,
};

/// In-memory source serving `records` in pages, optionally failing on one.
struct VecSource {
    records: Vec<TransactionRecord>,
    fail_on: Option<u64>,
    requested: Mutex<Vec<u64>>,
}

impl VecSource {
    fn new(records: Vec<TransactionRecord>) -> Self {
        Self {
            records,
            fail_on: None,
            requested: Mutex::new(Vec::new()),
        }
    }

    fn failing_on(mut self, page: u64) -> Self {
        self.fail_on = Some(page);
        self
    }

    fn requested(&self) -> Vec<u64> {
        self.requested.lock().unwrap().clone()
    }
}

impl RecordSource for VecSource {
    async fn list_page(&self, page: u64, size: u64) -> Result<RecordPage, EngineError> {
        self.requested.lock().unwrap().push(page);
        if self.fail_on == Some(page) {
            return Err(EngineError::Database(DbErr::Custom("source down".to_string())));
        }
        let start = ((page - 1) * size) as usize;
        let records = self
            .records
            .iter()
            .skip(start)
            .take(size as usize)
            .cloned()
            .collect();
        Ok(RecordPage {
            records,
            page,
            total: self.records.len() as u64,
        })
    }
}

fn at(i: usize) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap() + Duration::hours(i as i64)
}

fn record(i: usize) -> TransactionRecord {
    TransactionRecord {
        transaction_id: format!("00000000-0000-4000-8000-{i:012}"),
        no_ref: format!("REF{i:05}"),
        order_type_code: "TRF".to_string(),
        order_type_name: "Transfer".to_string(),
        transaction_type_code: "DB".to_string(),
        transaction_type_name: "Debit".to_string(),
        transaction_date: at(i),
        from_account_number: "1000200030".to_string(),
        from_account_name: "Alice \"Al\" Smith".to_string(),
        from_account_product_name: "Savings".to_string(),
        to_account_number: "4000500060".to_string(),
        to_account_name: "Bob".to_string(),
        to_account_product_name: "Checking".to_string(),
        amount: Decimal::new(100_000 + i as i64, 2),
        status: "SUCCESS".to_string(),
        description: format!("payment {i}, monthly"),
        method: "MOBILE".to_string(),
        currency: "IDR".to_string(),
        metadata: r#"{"channel":"app"}"#.to_string(),
    }
}

fn records(n: usize) -> Vec<TransactionRecord> {
    (0..n).map(record).collect()
}

fn settings(chunk_limit_bytes: u64) -> ExportSettings {
    ExportSettings {
        chunk_limit_bytes,
        page_size: 4,
        strict_date_filters: true,
    }
}

fn request(part: Option<&str>, excel: bool) -> ExportRequest {
    let excel = excel.then_some("true");
    ExportRequest::parse(None, None, part, excel, &ExportSettings::default()).unwrap()
}

fn expect_file(outcome: ExportOutcome) -> export::CsvFile {
    match outcome {
        ExportOutcome::File(file) => file,
        ExportOutcome::Manifest(manifest) => panic!("expected a file, got {manifest:?}"),
    }
}

fn expect_manifest(outcome: ExportOutcome) -> export::Manifest {
    match outcome {
        ExportOutcome::Manifest(manifest) => manifest,
        ExportOutcome::File(file) => panic!("expected a manifest, got {}", file.filename),
    }
}

#[tokio::test]
async fn small_export_is_a_single_file() {
    let source = VecSource::new(records(3));
    let outcome = export::export(&source, &request(None, false), &settings(10 * 1024))
        .await
        .unwrap();

    let file = expect_file(outcome);
    assert_eq!(file.filename, "transactions.csv");
    assert_eq!(file.num_parts, 1);
    assert_eq!(file.rows, 3);
    assert_eq!(read_csv(file.body.as_slice()).unwrap(), records(3));
}

#[tokio::test]
async fn empty_export_is_a_header_only_file() {
    let source = VecSource::new(Vec::new());
    let file = expect_file(
        export::export(&source, &request(None, false), &settings(10 * 1024))
            .await
            .unwrap(),
    );

    let text = String::from_utf8(file.body).unwrap();
    assert_eq!(text, format!("{}\n", COLUMNS.join(",")));
    assert_eq!(file.rows, 0);
}

#[tokio::test]
async fn large_export_returns_a_manifest() {
    let rows = records(12);
    let total = estimate_bytes(&rows).unwrap();
    let header = estimate_header_bytes().unwrap();
    let limit = total / 3;

    let source = VecSource::new(rows);
    let manifest = expect_manifest(
        export::export(&source, &request(None, true), &settings(limit))
            .await
            .unwrap(),
    );

    assert_eq!(manifest.total_bytes, total);
    assert_eq!(manifest.chunk_limit, limit);
    assert_eq!(manifest.num_parts, (total + header).div_ceil(limit + header));
    assert!(manifest.num_parts > 1);
    assert_eq!(
        manifest.part_query(1),
        vec![("excel", "true".to_string()), ("part", "1".to_string())]
    );
}

#[tokio::test]
async fn parts_concatenate_to_the_full_export() {
    let rows = records(13);
    let limit = estimate_bytes(&rows).unwrap() / 4;
    let settings = settings(limit);
    let source = VecSource::new(rows.clone());

    let manifest = expect_manifest(
        export::export(&source, &request(None, false), &settings)
            .await
            .unwrap(),
    );

    let mut joined = Vec::new();
    for part in 1..=manifest.num_parts {
        let raw = part.to_string();
        let file = expect_file(
            export::export(&source, &request(Some(&raw), false), &settings)
                .await
                .unwrap(),
        );
        assert_eq!(
            file.filename,
            format!("transactions_part_{part}_of_{}.csv", manifest.num_parts)
        );
        assert_eq!(file.num_parts, manifest.num_parts);
        assert!(file.rows > 0);
        joined.extend(read_csv(file.body.as_slice()).unwrap());
    }
    assert_eq!(joined, rows);
}

#[tokio::test]
async fn part_mode_wins_even_when_everything_fits() {
    let source = VecSource::new(records(2));
    let file = expect_file(
        export::export(&source, &request(Some("1"), false), &settings(10 * 1024))
            .await
            .unwrap(),
    );

    assert_eq!(file.filename, "transactions_part_1_of_1.csv");
    assert_eq!(file.rows, 2);
}

#[tokio::test]
async fn out_of_range_parts_are_rejected() {
    let rows = records(10);
    let limit = estimate_bytes(&rows).unwrap() / 2;
    let settings = settings(limit);
    let source = VecSource::new(rows);
    let num_parts = expect_manifest(
        export::export(&source, &request(None, false), &settings)
            .await
            .unwrap(),
    )
    .num_parts;

    for part in [0, num_parts + 1] {
        let raw = part.to_string();
        let err = export::export(&source, &request(Some(&raw), false), &settings)
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::InvalidPart(raw));
        assert_eq!(err.to_string(), "invalid part");
    }
}

#[tokio::test]
async fn excel_flag_prefixes_a_bom() {
    let source = VecSource::new(records(1));
    let plain = expect_file(
        export::export(&source, &request(None, false), &settings(10 * 1024))
            .await
            .unwrap(),
    );
    let excel = expect_file(
        export::export(&source, &request(None, true), &settings(10 * 1024))
            .await
            .unwrap(),
    );

    assert!(excel.body.starts_with(&UTF8_BOM));
    assert_eq!(&excel.body[UTF8_BOM.len()..], plain.body.as_slice());
    assert_eq!(read_csv(excel.body.as_slice()).unwrap(), records(1));
}

#[tokio::test]
async fn exports_are_deterministic() {
    let source = VecSource::new(records(9));
    let settings = settings(10 * 1024);

    let first = export::export(&source, &request(None, false), &settings)
        .await
        .unwrap();
    let second = export::export(&source, &request(None, false), &settings)
        .await
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn paging_stops_on_the_reported_total() {
    // 8 records, page size 4: two full pages cover the total.
    let source = VecSource::new(records(8));
    export::export(&source, &request(None, false), &settings(10 * 1024))
        .await
        .unwrap();
    assert_eq!(source.requested(), vec![1, 2]);

    // 9 records: the third page comes back short.
    let source = VecSource::new(records(9));
    export::export(&source, &request(None, false), &settings(10 * 1024))
        .await
        .unwrap();
    assert_eq!(source.requested(), vec![1, 2, 3]);
}

#[tokio::test]
async fn filtering_does_not_stop_paging() {
    // Only the last record is inside the window; earlier pages filter to nothing.
    let rows = records(10);
    let from = at(9).format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let settings = settings(10 * 1024);
    let request = ExportRequest::parse(Some(&from), None, None, None, &settings).unwrap();

    let source = VecSource::new(rows);
    let file = expect_file(export::export(&source, &request, &settings).await.unwrap());

    assert_eq!(source.requested(), vec![1, 2, 3]);
    assert_eq!(file.rows, 1);
    assert_eq!(file.filename, "transactions_2024-01-01_to_all.csv");
    assert_eq!(read_csv(file.body.as_slice()).unwrap(), vec![record(9)]);
}

#[tokio::test]
async fn a_failing_page_aborts_the_export() {
    let source = VecSource::new(records(10)).failing_on(2);
    let err = export::export(&source, &request(None, false), &settings(10 * 1024))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Database(_)));
    assert_eq!(source.requested(), vec![1, 2]);
}
