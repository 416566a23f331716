use crate::query::Query;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// 1-indexed.
    pub page: u32,
    pub total_pages: u64,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Page affordances for `query` given the number of matching records.
///
/// With `total == 0` there are zero pages; the query still sits on page 1 and
/// neither direction is available.
pub fn derive(query: &Query, total: u64) -> PageInfo {
    let limit = u64::from(query.limit().get());
    let total_pages = total.div_ceil(limit);
    let page = (query.offset() / query.limit().get()).saturating_add(1);

    PageInfo {
        page,
        total_pages,
        has_prev: page > 1,
        has_next: u64::from(page) < total_pages,
    }
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
