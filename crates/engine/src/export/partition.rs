//! Splitting an export into size-bounded parts.

use std::ops::Range;

/// How many parts an export needs, derived from its estimated size.
///
/// Every part repeats the header, so the budget per part is
/// `chunk_limit + header_bytes` and the total is credited one extra header:
///
/// ```text
/// num_parts = max(1, ceil((total_bytes + header_bytes) / (chunk_limit + header_bytes)))
/// ```
///
/// ```rust
/// use engine::PartitionPlan;
///
/// let plan = PartitionPlan::new(11_410, 160, 10_240);
/// assert_eq!(plan.num_parts, 2);
/// assert!(!plan.fits_single_file());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartitionPlan {
    /// Size of the whole document, header included.
    pub total_bytes: u64,
    pub header_bytes: u64,
    pub chunk_limit: u64,
    pub num_parts: u64,
}

impl PartitionPlan {
    pub fn new(total_bytes: u64, header_bytes: u64, chunk_limit: u64) -> Self {
        let budget = chunk_limit.saturating_add(header_bytes).max(1);
        let num_parts = total_bytes
            .saturating_add(header_bytes)
            .div_ceil(budget)
            .max(1);
        Self {
            total_bytes,
            header_bytes,
            chunk_limit,
            num_parts,
        }
    }

    /// Whether the whole export can be served as one file.
    pub fn fits_single_file(&self) -> bool {
        self.num_parts == 1 && self.total_bytes <= self.chunk_limit
    }

    /// Whether `part` is a valid 1-based index into this plan.
    pub fn contains_part(&self, part: u64) -> bool {
        (1..=self.num_parts).contains(&part)
    }
}

/// Row range `[start, end)` of the 1-based `part` out of `num_parts`.
///
/// Rows are split as evenly as possible; the first `total_rows % num_parts`
/// parts take one extra row each.
pub fn part_range(total_rows: usize, num_parts: u64, part: u64) -> Range<usize> {
    if num_parts <= 1 || total_rows == 0 {
        return 0..total_rows;
    }
    let num_parts = usize::try_from(num_parts).unwrap_or(usize::MAX);
    let index = usize::try_from(part.saturating_sub(1)).unwrap_or(usize::MAX);

    let base = total_rows / num_parts;
    let rem = total_rows % num_parts;

    let start = index
        .saturating_mul(base)
        .saturating_add(rem.min(index))
        .min(total_rows);
    let extra = usize::from(index < rem);
    let end = start.saturating_add(base + extra).min(total_rows);
    start..end
}
