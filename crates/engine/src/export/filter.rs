//! Date filters of an export request.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use crate::{EngineError, ResultEngine};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// One side of the date window, as the caller wrote it.
///
/// `YYYY-MM-DD` input means midnight UTC of that day; anything longer must
/// be an RFC3339 timestamp and keeps its offset so labels and links can be
/// rendered in the caller's own terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterBound {
    at: DateTime<FixedOffset>,
    date_only: bool,
}

impl FilterBound {
    /// Parse a bound; `None` for empty input or when the text is malformed.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        if input.len() == 10 {
            let day = NaiveDate::parse_from_str(input, DAY_FORMAT).ok()?;
            let at = day.and_hms_opt(0, 0, 0)?.and_utc().fixed_offset();
            return Some(Self { at, date_only: true });
        }
        let at = DateTime::parse_from_rfc3339(input).ok()?;
        Some(Self {
            at,
            date_only: false,
        })
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.at.with_timezone(&Utc)
    }

    pub fn is_date_only(&self) -> bool {
        self.date_only
    }

    /// Calendar day in the bound's own offset, e.g. `2024-01-31`.
    pub fn day_label(&self) -> String {
        self.at.format(DAY_FORMAT).to_string()
    }

    /// Text that parses back to this exact bound.
    pub fn query_value(&self) -> String {
        if self.date_only {
            self.day_label()
        } else {
            self.at.to_rfc3339()
        }
    }
}

/// Inclusive `[from, to]` window on `transaction_date`; a missing side is open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub from: Option<FilterBound>,
    pub to: Option<FilterBound>,
}

impl DateWindow {
    /// Build a window from raw query values.
    ///
    /// A malformed bound is dropped with a warning, unless `strict` is set, in
    /// which case it is rejected with `"invalid from"` / `"invalid to"`.
    pub fn parse(from: Option<&str>, to: Option<&str>, strict: bool) -> ResultEngine<Self> {
        Ok(Self {
            from: parse_bound("from", from, strict)?,
            to: parse_bound("to", to, strict)?,
        })
    }

    pub fn is_bounded(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let after_from = self.from.is_none_or(|from| at >= from.instant());
        let before_to = self.to.is_none_or(|to| at <= to.instant());
        after_from && before_to
    }
}

fn parse_bound(name: &str, raw: Option<&str>, strict: bool) -> ResultEngine<Option<FilterBound>> {
    let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
        return Ok(None);
    };
    match FilterBound::parse(raw) {
        Some(bound) => Ok(Some(bound)),
        None if strict => Err(EngineError::InvalidFilter(format!("invalid {name}"))),
        None => {
            tracing::warn!("ignoring malformed `{name}` filter: {raw:?}");
            Ok(None)
        }
    }
}
