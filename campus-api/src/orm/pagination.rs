//! The shared list-query contract: page/limit/search normalization and the
//! response envelope every paginated listing returns.

use serde::Serialize;
use ts_rs::TS;

/// Maximum page size a client can request. Larger values are clamped rather
/// than rejected.
pub const MAX_LIMIT: i64 = 100;

/// Normalized list-query parameters. `page` is 1-based.
#[derive(Debug, Clone)]
pub struct ListParams {
    pub page: i64,
    pub limit: i64,
    pub search: String,
}

impl ListParams {
    /// Applies the defaults (page 1, limit 10, empty search) and clamps the
    /// values into their valid ranges.
    pub fn new(page: Option<i64>, limit: Option<i64>, search: Option<String>) -> Self {
        ListParams {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(10).clamp(1, MAX_LIMIT),
            search: search.unwrap_or_default(),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// SQL LIKE pattern for the substring search, or `None` when the search
    /// term is blank.
    pub fn like_pattern(&self) -> Option<String> {
        like_term(&self.search)
    }
}

/// `%term%` for a non-blank term, `None` otherwise. SQLite's LIKE is
/// case-insensitive for ASCII, so one pattern serves both the listings and
/// the selection endpoints.
pub fn like_term(search: &str) -> Option<String> {
    let term = search.trim();
    if term.is_empty() {
        None
    } else {
        Some(format!("%{}%", term))
    }
}

/// The common list response envelope.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct Page<T: TS> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl<T: TS> Page<T> {
    pub fn new(data: Vec<T>, total: i64, params: &ListParams) -> Self {
        Page {
            data,
            total,
            page: params.page,
            limit: params.limit,
        }
    }
}
