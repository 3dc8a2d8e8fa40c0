//! Page/limit parsing and the pagination summary returned by list endpoints.
//!
//! Pages are 1-based. `total_pages` is the ceiling of `total_records / limit`, so an
//! empty collection has zero pages. Navigation URLs reuse the request path with a
//! `page=..&limit=..` query and are present only when the neighbouring page exists.

use crate::error::AppError;
use serde::Serialize;
use std::collections::HashMap;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Result<Self, AppError> {
        if page < 1 {
            return Err(AppError::Validation("page must be at least 1".into()));
        }
        if limit < 1 {
            return Err(AppError::Validation("limit must be at least 1".into()));
        }
        if limit > MAX_LIMIT {
            return Err(AppError::Validation(format!(
                "limit must be at most {}",
                MAX_LIMIT
            )));
        }
        Ok(PageRequest { page, limit })
    }

    /// Read `page` and `limit` from query parameters; other keys are ignored.
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self, AppError> {
        let page = parse_param(params, "page")?.unwrap_or(DEFAULT_PAGE);
        let limit = parse_param(params, "limit")?.unwrap_or(DEFAULT_LIMIT);
        Self::new(page, limit)
    }

    /// Number of active rows that precede this page.
    pub fn offset(&self) -> u64 {
        (u64::from(self.page) - 1) * u64::from(self.limit)
    }
}

fn parse_param(params: &HashMap<String, String>, key: &str) -> Result<Option<u32>, AppError> {
    match params.get(key).map(|v| v.trim()) {
        None | Some("") => Ok(None),
        Some(v) => {
            // Distinguish "0"/"-3" from garbage so the message says what was wrong.
            let n: i64 = v
                .parse()
                .map_err(|_| AppError::Validation(format!("{} must be an integer", key)))?;
            if n < 1 {
                return Err(AppError::Validation(format!("{} must be at least 1", key)));
            }
            u32::try_from(n)
                .map(Some)
                .map_err(|_| AppError::Validation(format!("{} is too large", key)))
        }
    }
}

pub fn total_pages(total_records: u64, limit: u32) -> u64 {
    total_records.div_ceil(u64::from(limit))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u64,
    pub total_records: u64,
    pub record_per_page: u32,
    pub previous_page_url: Option<String>,
    pub next_page_url: Option<String>,
}

impl Pagination {
    /// `base_path` is the path the list was requested on, without query string.
    pub fn new(request: PageRequest, total_records: u64, base_path: &str) -> Self {
        let total_pages = total_pages(total_records, request.limit);
        let page = request.page;
        let link = |p: u32| format!("{}?page={}&limit={}", base_path, p, request.limit);

        let previous_page_url = (page > 1).then(|| link(page - 1));
        let next_page_url = (u64::from(page) < total_pages).then(|| link(page + 1));

        Pagination {
            current_page: page,
            total_pages,
            total_records,
            record_per_page: request.limit,
            previous_page_url,
            next_page_url,
        }
    }
}
