//! Page arithmetic. Pages are 1-based.

use std::ops::Range;

/// Number of pages needed for `count` items, `0` when there is nothing to
/// show or `page_size` is zero.
#[must_use]
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        count.div_ceil(page_size)
    }
}

/// Clamps a requested page into `1..=max(1, total)`.
#[must_use]
pub fn clamp_page(page: usize, total: usize) -> usize {
    page.clamp(1, total.max(1))
}

/// Index range of `page` within `count` items. Out-of-range pages yield an
/// empty range rather than panicking.
#[must_use]
pub fn page_range(count: usize, page: usize, page_size: usize) -> Range<usize> {
    let start = page
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(count);
    let end = start.saturating_add(page_size).min(count);
    start..end
}

/// The slice of `items` shown on `page`.
#[must_use]
pub fn page<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    &items[page_range(items.len(), page, page_size)]
}
