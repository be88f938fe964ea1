use serde::{Deserialize, Serialize};

/// Uniform JSON body used by every non-file response.
///
/// `data` and `meta` are omitted from the JSON when absent, so an error body
/// is just `{"success": false, "message": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<D, M = ()> {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<D>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<M>,
}

impl<D, M> Envelope<D, M> {
    pub fn ok(data: D, meta: Option<M>) -> Self {
        Self {
            success: true,
            message: "OK".to_string(),
            data: Some(data),
            meta,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            meta: None,
        }
    }
}

pub mod export {
    use super::*;

    /// Query string of `GET /v1/transactions/export.csv`.
    ///
    /// Every field is kept as raw text: the engine decides how lenient it is
    /// with malformed values.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct ExportQuery {
        /// Inclusive lower bound, `YYYY-MM-DD` or RFC3339.
        pub from: Option<String>,
        /// Inclusive upper bound, `YYYY-MM-DD` or RFC3339.
        pub to: Option<String>,
        /// 1-based part index.
        pub part: Option<String>,
        /// Only the literal `"true"` enables the byte-order mark.
        pub excel: Option<String>,
    }

    /// `data` of a manifest response.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExportLinks {
        pub links: Vec<String>,
    }

    /// `meta` of a manifest response.
    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ExportMeta {
        pub total_bytes_estimate: u64,
        pub chunk_limit_bytes: u64,
        pub num_parts: u64,
    }

    pub type ManifestResponse = super::Envelope<ExportLinks, ExportMeta>;
}
