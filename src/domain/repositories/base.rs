//! Generic capabilities shared by every repository.

use async_trait::async_trait;

use crate::error::AppError;

/// Default page size of listings.
pub const DEFAULT_PER_PAGE: i64 = 20;

/// Largest page size a client may request.
pub const MAX_PER_PAGE: i64 = 100;

/// Read access to a table of `T`.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCategoryRepository`]
/// - [`crate::infrastructure::persistence::PgProductRepository`]
/// - [`crate::infrastructure::persistence::PgOrderRepository`]
#[async_trait]
pub trait Reader<T: Send + 'static>: Send + Sync {
    /// Finds a record by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<T>, AppError>;

    /// Lists records in the repository's stable order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<T>, AppError>;

    /// Counts all records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;
}

/// Write access: create from `N`, yielding `T`.
#[async_trait]
pub trait Writer<N: Send + 'static, T: Send + 'static>: Send + Sync {
    /// Inserts a record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a unique key (e.g. the slug) is taken
    /// or a referenced row does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new: N) -> Result<T, AppError>;

    /// Deletes a record by primary key.
    ///
    /// Returns `Ok(false)` if nothing was deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if other rows still reference the record.
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

/// One page of results together with the total match count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64) -> Self {
        Self { items, total }
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// A validated 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self { page, per_page }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    /// Number of pages needed for `total` items, at least 1.
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 || self.per_page <= 0 {
            1
        } else {
            (total + self.per_page - 1) / self.per_page
        }
    }
}
