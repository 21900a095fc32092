//! Turning per-page classifications into sub-document page ranges.
//!
//! Boundaries travel between stages as 1-based "split numbers": the first
//! page of each sub-document. Callers may also supply split numbers directly,
//! so every entry point normalizes them first.

use tracing::debug;

use crate::models::{ClassificationResult, PageRange};

/// Split numbers (1-based) found by walking the classifications in order.
///
/// A matched page that is not the start of the current sub-document closes
/// it; the start of the final sub-document is always emitted. `classifications`
/// must be sorted by page index.
pub fn find_split_numbers(classifications: &[ClassificationResult]) -> Vec<u32> {
    let mut splits = Vec::new();
    let mut start = 0u32;

    for result in classifications {
        if result.is_boundary() && result.page_index != start {
            splits.push(start + 1);
            start = result.page_index;
        }
    }
    splits.push(start + 1);

    debug!("Split numbers: {:?}", splits);
    splits
}

/// Deduplicate, sort and drop split numbers outside `[1, total_pages]`.
pub fn normalize_split_numbers(split_numbers: &[u32], total_pages: u32) -> Vec<u32> {
    let mut splits: Vec<u32> = split_numbers
        .iter()
        .copied()
        .filter(|&s| (1..=total_pages).contains(&s))
        .collect();
    splits.sort_unstable();
    splits.dedup();
    splits
}

/// 0-based inclusive page ranges for the given split numbers.
///
/// When the first split number is 1 and more follow, page 0 becomes a range
/// of its own and the next range starts at page 1. Pages before a first split
/// number greater than 1 form a leading range. Ranges that would hold no
/// pages are dropped, so the result always partitions `[0, total_pages)`.
pub fn page_ranges(split_numbers: &[u32], total_pages: u32) -> Vec<PageRange> {
    if total_pages == 0 {
        return Vec::new();
    }

    let splits = normalize_split_numbers(split_numbers, total_pages);
    let last_page = total_pages - 1;

    let Some(&first) = splits.first() else {
        return PageRange::new(0, last_page).into_iter().collect();
    };

    let mut ranges = Vec::with_capacity(splits.len() + 1);
    if first > 1 {
        ranges.push(PageRange::new(0, first - 2));
    }

    for (i, &split) in splits.iter().enumerate() {
        match splits.get(i + 1) {
            None => ranges.push(PageRange::new(split - 1, last_page)),
            Some(&next) if i == 0 && split == 1 => {
                ranges.push(PageRange::new(0, 0));
                ranges.push(PageRange::new(1, next - 2));
            }
            Some(&next) => ranges.push(PageRange::new(split - 1, next - 2)),
        }
    }

    let ranges: Vec<PageRange> = ranges.into_iter().flatten().collect();
    debug!(
        "Page ranges for {} pages: {}",
        total_pages,
        ranges
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    ranges
}

/// Ranges for a full classification sequence.
pub fn segment(classifications: &[ClassificationResult], total_pages: u32) -> Vec<PageRange> {
    page_ranges(&find_split_numbers(classifications), total_pages)
}
