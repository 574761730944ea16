use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Entries per page for catalog browsing and watch history
pub const PER_PAGE: usize = 24;

/// A validated, 1-based page number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
}

impl PageRequest {
    pub fn new(page: i64) -> AppResult<Self> {
        match usize::try_from(page) {
            Ok(page) if page >= 1 => Ok(Self { page }),
            _ => Err(AppError::InvalidParameter(format!(
                "page must be at least 1, got {}",
                page
            ))),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Entries skipped before this page
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(PER_PAGE)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1 }
    }
}

/// One page of an ordered listing. Pages past the end are empty, not errors.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub pages: usize,
}

impl<T> Page<T> {
    /// Wraps items already cut to the requested page
    pub fn new(items: Vec<T>, request: PageRequest, total: usize) -> Self {
        Self {
            items,
            page: request.page(),
            per_page: PER_PAGE,
            total,
            pages: total.div_ceil(PER_PAGE),
        }
    }

    /// Cuts the requested page out of a complete, already ordered listing
    pub fn slice(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len();
        let items = all
            .into_iter()
            .skip(request.offset())
            .take(PER_PAGE)
            .collect();
        Self::new(items, request, total)
    }
}
