use super::filter::{DateWindow, FilterBound};

const STEM: &str = "transactions";

/// Attachment name for an export.
///
/// `part` is `(index, num_parts)` when a single part is served. A missing
/// bound of a filtered window is rendered as `all`.
pub fn file_name(window: &DateWindow, part: Option<(u64, u64)>) -> String {
    let mut name = STEM.to_string();
    if window.is_bounded() {
        let label = |bound: Option<FilterBound>| {
            bound.map_or_else(|| "all".to_string(), |b| b.day_label())
        };
        name.push_str(&format!("_{}_to_{}", label(window.from), label(window.to)));
    }
    if let Some((index, num_parts)) = part {
        name.push_str(&format!("_part_{index}_of_{num_parts}"));
    }
    name.push_str(".csv");
    name
}
