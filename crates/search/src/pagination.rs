//! Connection-style pagination
//!
//! `first` and `after` are turned into a [`PaginationWindow`], which is
//! applied to the full match list after filtering. Cursors are decimal
//! offsets: the cursor of the item at position `p` is `p + 1`, so passing a
//! page's `endCursor` as `after` yields the next page.

use itemsearch_common::errors::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Raw connection arguments
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConnectionArgs {
    /// Page size; absent or zero means unbounded
    #[serde(default)]
    pub first: Option<usize>,

    /// Cursor to continue after
    #[serde(default)]
    pub after: Option<String>,
}

impl ConnectionArgs {
    /// Resolve into a window; `cap` bounds an explicit page size only
    pub fn window(&self, cap: Option<usize>) -> Result<PaginationWindow> {
        let offset = match self.after.as_deref().map(str::trim) {
            None | Some("") => 0,
            Some(cursor) => cursor.parse::<usize>().map_err(|_| AppError::InvalidCursor {
                cursor: cursor.to_string(),
            })?,
        };

        let requested = self.first.filter(|n| *n > 0);
        let limit = match (requested, cap) {
            (Some(n), Some(cap)) => Some(n.min(cap)),
            (Some(n), None) => Some(n),
            (None, _) => None,
        };

        Ok(PaginationWindow { offset, limit })
    }
}

/// Offset and optional limit over a filtered result list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationWindow {
    pub offset: usize,
    pub limit: Option<usize>,
}

impl PaginationWindow {
    pub fn apply<T>(&self, matches: Vec<T>) -> PagedResult<T> {
        let total_count = matches.len();
        let items: Vec<T> = matches
            .into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect();

        let end = self.offset + items.len();
        let page_info = PageInfo {
            has_previous_page: self.offset > 0,
            has_next_page: end < total_count,
            start_cursor: (!items.is_empty()).then(|| (self.offset + 1).to_string()),
            end_cursor: (!items.is_empty()).then(|| end.to_string()),
        };

        PagedResult {
            items,
            offset: self.offset,
            total_count,
            page_info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// One page of results
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    /// Effective starting offset
    pub offset: usize,
    /// Matches before windowing
    pub total_count: usize,
    pub page_info: PageInfo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use itemsearch_common::errors::ErrorCode;

    fn args(first: Option<usize>, after: Option<&str>) -> ConnectionArgs {
        ConnectionArgs {
            first,
            after: after.map(str::to_string),
        }
    }

    #[test]
    fn test_unspecified_window_returns_everything() {
        let window = args(None, None).window(None).unwrap();
        assert_eq!(window, PaginationWindow { offset: 0, limit: None });

        let page = window.apply((0..10).collect::<Vec<_>>());
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.offset, 0);
        assert!(!page.page_info.has_next_page);
        assert!(!page.page_info.has_previous_page);
    }

    #[test]
    fn test_zero_first_is_unbounded() {
        let window = args(Some(0), None).window(None).unwrap();
        assert_eq!(window.limit, None);
    }

    #[test]
    fn test_after_skips_to_offset() {
        let page = args(None, Some("5")).window(None).unwrap().apply((0..10).collect());
        assert_eq!(page.items, vec![5, 6, 7, 8, 9]);
        assert_eq!(page.offset, 5);
        assert_eq!(page.total_count, 10);
        assert!(page.page_info.has_previous_page);
    }

    #[test]
    fn test_end_cursor_continues() {
        let first = args(Some(3), None).window(None).unwrap().apply((0..10).collect());
        assert_eq!(first.items, vec![0, 1, 2]);
        assert!(first.page_info.has_next_page);
        assert_eq!(first.page_info.start_cursor.as_deref(), Some("1"));

        let cursor = first.page_info.end_cursor.clone();
        let second = args(Some(3), cursor.as_deref()).window(None).unwrap().apply((0..10).collect());
        assert_eq!(second.items, vec![3, 4, 5]);
    }

    #[test]
    fn test_cap_limits_page_size() {
        assert_eq!(args(Some(500), None).window(Some(50)).unwrap().limit, Some(50));
        assert_eq!(args(Some(5), None).window(Some(50)).unwrap().limit, Some(5));
    }

    #[test]
    fn test_cap_leaves_unspecified_window_unbounded() {
        let window = args(None, None).window(Some(50)).unwrap();
        assert_eq!(window.limit, None);

        let page = window.apply((0..120).collect::<Vec<_>>());
        assert_eq!(page.items.len(), 120);
        assert!(!page.page_info.has_next_page);

        assert_eq!(args(Some(0), None).window(Some(50)).unwrap().limit, None);
    }

    #[test]
    fn test_offset_past_end_is_empty() {
        let page = args(None, Some("20")).window(None).unwrap().apply((0..10).collect::<Vec<i32>>());
        assert!(page.items.is_empty());
        assert_eq!(page.page_info.end_cursor, None);
        assert!(!page.page_info.has_next_page);
    }

    #[test]
    fn test_malformed_cursor() {
        let err = args(None, Some("abc")).window(None).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidCursor);
    }
}
