//! Result Store: roast records and the email captures that unlock them.

pub mod sqlite;
pub mod types;

pub use sqlite::SqliteRoastStore;
pub use types::{EmailCapture, NewRoast, RoastRecord};

use crate::error::RoastError;
use std::future::Future;
use std::pin::Pin;

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RoastError>> + Send + 'a>>;

/// Async persistence contract for roast records.
///
/// Records are never deleted. The only mutation after creation is
/// [`RoastStore::mark_email_captured`], which is idempotent.
pub trait RoastStore: Send + Sync {
    /// Persist a new record with a fresh id, timestamp and `email_captured = false`.
    fn create<'a>(&'a self, roast: NewRoast) -> StoreFuture<'a, RoastRecord>;

    /// Fails with `NotFound` for unknown ids.
    fn get<'a>(&'a self, id: &'a str) -> StoreFuture<'a, RoastRecord>;

    fn mark_email_captured<'a>(&'a self, id: &'a str) -> StoreFuture<'a, ()>;

    fn create_email_capture<'a>(
        &'a self,
        roast_id: &'a str,
        email: &'a str,
    ) -> StoreFuture<'a, EmailCapture>;

    fn count<'a>(&'a self) -> StoreFuture<'a, u64>;
}
