//! Pagination types
//!
//! One page model for every list endpoint: `page` is 1-indexed and
//! `page_size` is bounded to `1..=MAX_PAGE_SIZE`. Out-of-range values are
//! rejected rather than clamped.

use serde::{Deserialize, Serialize};

use super::validation::{FieldError, ValidationError};

/// Maximum items per page
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default items per page
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Validated pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number (1-indexed)
    pub page: u32,
    /// Items per page
    pub page_size: u32,
}

impl Pagination {
    /// Create pagination, rejecting `page < 1` and page sizes outside
    /// `1..=MAX_PAGE_SIZE`.
    pub fn new(page: u32, page_size: u32) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();
        check_bounds("page", page.into(), 1, u32::MAX.into(), &mut errors);
        check_bounds(
            "page_size",
            page_size.into(),
            1,
            MAX_PAGE_SIZE.into(),
            &mut errors,
        );

        if errors.is_empty() {
            Ok(Self { page, page_size })
        } else {
            Err(errors)
        }
    }

    /// SQL OFFSET: `(page - 1) * page_size`.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.page_size)
    }

    /// SQL LIMIT.
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper: `{items, total, page, page_size}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items for current page
    pub items: Vec<T>,
    /// Total count across all pages
    pub total: i64,
    /// Current page number
    pub page: u32,
    /// Items per page
    pub page_size: u32,
}

impl<T> Paginated<T> {
    /// Convert every item, keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Raw query parameters for pagination.
///
/// Kept as text so non-numeric values surface as field errors instead of a
/// generic query rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl TryFrom<PaginationParams> for Pagination {
    type Error = Vec<FieldError>;

    fn try_from(params: PaginationParams) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();

        let page = parse_param("page", params.page, 1, u32::MAX.into(), &mut errors);
        let page_size = parse_param(
            "page_size",
            params.page_size,
            DEFAULT_PAGE_SIZE.into(),
            MAX_PAGE_SIZE.into(),
            &mut errors,
        );

        match (page, page_size) {
            (Some(page), Some(page_size)) if errors.is_empty() => Ok(Self { page, page_size }),
            _ => Err(errors),
        }
    }
}

fn parse_param(
    name: &'static str,
    raw: Option<String>,
    default: i64,
    max: i64,
    errors: &mut Vec<FieldError>,
) -> Option<u32> {
    let value = match raw {
        None => default,
        Some(text) => match text.trim().parse::<i64>() {
            Ok(v) => v,
            Err(_) => {
                errors.push(FieldError::new(["query", name], ValidationError::NotAnInteger));
                return None;
            }
        },
    };

    if check_bounds(name, value, 1, max, errors) {
        u32::try_from(value).ok()
    } else {
        None
    }
}

fn check_bounds(
    name: &'static str,
    value: i64,
    min: i64,
    max: i64,
    errors: &mut Vec<FieldError>,
) -> bool {
    if value < min {
        errors.push(FieldError::new(["query", name], ValidationError::BelowMin { min }));
        false
    } else if value > max {
        errors.push(FieldError::new(["query", name], ValidationError::AboveMax { max }));
        false
    } else {
        true
    }
}
