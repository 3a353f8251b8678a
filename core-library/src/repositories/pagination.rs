//! Pagination helper types for repository queries

use serde::{Deserialize, Serialize};

/// Number of songs returned when the caller does not ask for a limit.
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest window a single list query may return.
pub const MAX_LIMIT: u32 = 1000;

/// Limit/offset window for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Maximum number of rows to return
    pub limit: u32,
    /// Number of rows to skip
    pub offset: u32,
}

impl PageRequest {
    /// Create a new page request. The limit is capped at [`MAX_LIMIT`].
    ///
    /// # Examples
    ///
    /// ```
    /// use core_library::repositories::PageRequest;
    ///
    /// let request = PageRequest::new(20, 40);
    /// assert_eq!(request.limit(), 20);
    /// assert_eq!(request.offset(), 40);
    /// ```
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: limit.min(MAX_LIMIT),
            offset,
        }
    }

    /// Get the SQL LIMIT value
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Get the SQL OFFSET value
    pub fn offset(&self) -> u32 {
        self.offset
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}
