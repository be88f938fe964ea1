//! Transaction export endpoint

use api_types::{
    Envelope,
    export::{ExportLinks, ExportMeta, ExportQuery, ManifestResponse},
};
use axum::{
    Json,
    extract::{OriginalUri, Query, State, rejection::QueryRejection},
    http::{HeaderMap, HeaderValue, header},
    response::{IntoResponse, Response},
};
use axum_extra::{TypedHeader, extract::WithRejection, headers::Host};
use engine::{CsvFile, EngineError, ExportOutcome, ExportRequest, Manifest};
use url::Url;

use crate::{ServerError, server::ServerState};

const FORWARDED_PROTO: &str = "x-forwarded-proto";

impl From<QueryRejection> for ServerError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Generic(rejection.body_text())
    }
}

pub async fn export_csv(
    State(state): State<ServerState>,
    host: Option<TypedHeader<Host>>,
    headers: HeaderMap,
    OriginalUri(uri): OriginalUri,
    WithRejection(Query(query), _): WithRejection<Query<ExportQuery>, ServerError>,
) -> Result<Response, ServerError> {
    let config = &state.export;

    let request = ExportRequest::parse(
        query.from.as_deref(),
        query.to.as_deref(),
        query.part.as_deref(),
        query.excel.as_deref(),
        &config.settings,
    )
    .inspect_err(log_rejected_part)?;

    let outcome = tokio::time::timeout(
        config.timeout,
        state.engine.export(&request, &config.settings),
    )
    .await
    .map_err(|_| ServerError::Timeout)?
    .inspect_err(log_rejected_part)?;

    match outcome {
        ExportOutcome::File(file) => csv_response(file),
        ExportOutcome::Manifest(manifest) => {
            let base = match &config.public_url {
                Some(url) => url.clone(),
                None => request_url(
                    request_scheme(&headers),
                    host.as_ref().map(|h| &h.0),
                    uri.path(),
                )?,
            };
            Ok(Json(manifest_response(&base, &manifest)).into_response())
        }
    }
}

fn log_rejected_part(err: &EngineError) {
    if let EngineError::InvalidPart(raw) = err {
        tracing::warn!("rejected export part {raw:?}");
    }
}

fn csv_response(file: CsvFile) -> Result<Response, ServerError> {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file.filename))
        .map_err(|err| ServerError::Internal(format!("bad export filename: {err}")))?;
    tracing::info!(
        "sending {} ({} rows, {} bytes)",
        file.filename,
        file.rows,
        file.body.len()
    );

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/csv")),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.body,
    )
        .into_response())
}

/// `https` when a proxy in front of us says so, `http` otherwise.
fn request_scheme(headers: &HeaderMap) -> &'static str {
    let proto = headers
        .get(FORWARDED_PROTO)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim);
    match proto {
        Some(proto) if proto.eq_ignore_ascii_case("https") => "https",
        _ => "http",
    }
}

/// The URL the caller used, without its query.
fn request_url(scheme: &str, host: Option<&Host>, path: &str) -> Result<Url, ServerError> {
    let authority = match host {
        Some(host) => match host.port() {
            Some(port) => format!("{}:{port}", host.hostname()),
            None => host.hostname().to_string(),
        },
        None => "localhost".to_string(),
    };
    Url::parse(&format!("{scheme}://{authority}{path}"))
        .map_err(|err| ServerError::Generic(format!("invalid host: {err}")))
}

fn manifest_response(base: &Url, manifest: &Manifest) -> ManifestResponse {
    let links = (1..=manifest.num_parts)
        .map(|part| part_link(base, manifest, part))
        .collect();

    Envelope::ok(
        ExportLinks { links },
        Some(ExportMeta {
            total_bytes_estimate: manifest.total_bytes,
            chunk_limit_bytes: manifest.chunk_limit,
            num_parts: manifest.num_parts,
        }),
    )
}

fn part_link(base: &Url, manifest: &Manifest, part: u64) -> String {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.query_pairs_mut()
        .extend_pairs(manifest.part_query(part));
    url.to_string()
}
