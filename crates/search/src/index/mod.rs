//! Search index access
//!
//! An [`IndexProvider`] opens one [`IndexSession`] per search call. The
//! session is released when it is dropped, so every exit path of a caller,
//! including early `?` returns, gives it back.

mod memory;

pub use memory::{MemoryIndexProvider, MemorySession};

use crate::predicate::Predicate;
use crate::record::SearchRecord;
use itemsearch_common::errors::Result;

/// Opens search sessions against named indexes
#[async_trait::async_trait]
pub trait IndexProvider: Send + Sync {
    /// Open a session on `index_name`; unknown or unreachable indexes fail with
    /// `AppError::IndexUnavailable`
    async fn open_session(&self, index_name: &str) -> Result<Box<dyn IndexSession>>;
}

/// A scoped handle on one index, released on drop
#[async_trait::async_trait]
pub trait IndexSession: Send + Sync {
    fn index_name(&self) -> &str;

    /// Every record matching `predicate`, in index order
    async fn query(&self, predicate: &Predicate) -> Result<Vec<SearchRecord>>;
}
