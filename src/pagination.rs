//! Limit/offset pagination links.

use crate::config::PaginationConfig;
use crate::repository::Pagination;

const MAX_OFFSET: u64 = i64::MAX as u64;

impl PaginationConfig {
    /// Resolves the requested window; a zero `limit` falls back to the default.
    /// Offsets are clamped to what the database can bind as a signed integer.
    pub fn window(&self, limit: Option<u64>, offset: Option<u64>) -> Pagination {
        let limit = match limit {
            Some(0) | None => self.default_limit,
            Some(limit) => limit.min(self.max_limit),
        };
        Pagination {
            offset: offset.unwrap_or(0).min(MAX_OFFSET),
            limit,
        }
    }
}

/// `next` and `previous` links relative to `path`.
pub fn page_links(path: &str, page: Pagination, total: u64) -> (Option<String>, Option<String>) {
    let end = page.offset.saturating_add(page.limit);
    let next = (end < total).then(|| format!("{path}?limit={}&offset={end}", page.limit));

    let previous = (page.offset > 0).then(|| {
        if page.offset <= page.limit {
            format!("{path}?limit={}", page.limit)
        } else {
            format!("{path}?limit={}&offset={}", page.limit, page.offset - page.limit)
        }
    });

    (next, previous)
}
