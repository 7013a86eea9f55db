//! Derived list views: search filter and pagination.
//!
//! Everything here is a pure function over a snapshot of the records, so the
//! visible page is always recomputed rather than cached.

use crate::model::Record;

/// Records whose name, email or phone contains `query` (case-insensitive),
/// in their original order. A blank query matches everything.
pub fn filter_records<'a>(records: &'a [Record], query: &str) -> Vec<&'a Record> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|r| {
            r.name.to_lowercase().contains(&q)
                || r.email.to_lowercase().contains(&q)
                || r.phone.to_lowercase().contains(&q)
        })
        .collect()
}

/// Number of pages needed for `len` items, never less than one.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// The 1-based `page` of `items`. Out-of-range pages are empty.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(size).min(items.len());
    let end = start.saturating_add(size).min(items.len());
    &items[start..end]
}
