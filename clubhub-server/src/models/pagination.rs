//! Offset/limit pagination

use serde::{Deserialize, Serialize};

/// Maximum items per page
const MAX_LIMIT: u32 = 100;

/// Default items per page
const DEFAULT_LIMIT: u32 = 20;

/// Largest offset the database accepts as a skip count
const MAX_OFFSET: u64 = i64::MAX as u64;

/// Pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of items to skip (0..=i64::MAX)
    pub offset: u64,
    /// Items per page (1..=100)
    pub limit: u32,
}

impl Pagination {
    /// Create pagination, clamping limit to 1..=100 and offset to the
    /// largest skip the database accepts.
    pub fn new(offset: u64, limit: u32) -> Self {
        Self {
            offset: offset.min(MAX_OFFSET),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Apply the window to an already ordered slice.
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .skip(self.offset as usize)
            .take(self.limit as usize)
            .cloned()
            .collect()
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// A page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// Total count across all pages
    pub total: u64,
    pub offset: u64,
    pub limit: u32,
}

impl<T> Paginated<T> {
    /// Whether items exist past this page.
    pub fn has_more(&self) -> bool {
        self.offset + (self.items.len() as u64) < self.total
    }

    /// Convert the items, keeping the window.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            offset: self.offset,
            limit: self.limit,
        }
    }
}

/// Query parameters for pagination
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    pub offset: Option<u64>,
    pub limit: Option<u32>,
}

impl From<&PaginationParams> for Pagination {
    fn from(params: &PaginationParams) -> Self {
        Self::new(
            params.offset.unwrap_or(0),
            params.limit.unwrap_or(DEFAULT_LIMIT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_limit() {
        assert_eq!(Pagination::new(0, 0).limit, 1);
        assert_eq!(Pagination::new(0, 999).limit, 100);
        assert_eq!(Pagination::new(5, 10).limit, 10);
    }

    #[test]
    fn clamps_offset() {
        assert_eq!(Pagination::new(u64::MAX, 10).offset, i64::MAX as u64);
        assert_eq!(Pagination::new(42, 10).offset, 42);
        assert!(Pagination::new(u64::MAX, 10).slice(&[1, 2, 3]).is_empty());
    }

    #[test]
    fn defaults_from_params() {
        let p = Pagination::from(&PaginationParams::default());
        assert_eq!(p, Pagination::default());
        assert_eq!(p.limit, 20);
    }

    #[test]
    fn slice_window() {
        let items: Vec<u32> = (0..10).collect();
        assert_eq!(Pagination::new(8, 5).slice(&items), vec![8, 9]);
        assert!(Pagination::new(20, 5).slice(&items).is_empty());
    }

    #[test]
    fn has_more() {
        let page = Paginated {
            items: vec![1, 2],
            total: 5,
            offset: 0,
            limit: 2,
        };
        assert!(page.has_more());

        let last = Paginated {
            items: vec![5],
            total: 5,
            offset: 4,
            limit: 2,
        };
        assert!(!last.has_more());
    }
}
