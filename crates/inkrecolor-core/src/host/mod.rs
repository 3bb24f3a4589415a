//! Host abstraction: where pages come from and go back to.

mod file;
mod memory;

pub use file::FileHost;
pub use memory::MemoryHost;

use crate::page::Page;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Host errors.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Page not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Host error: {0}")]
    Other(String),
}

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// The application that owns the page being edited.
///
/// Implementations must be Send + Sync.
pub trait PageHost: Send + Sync {
    /// Fetch a snapshot of the current page.
    fn fetch_page(&self) -> BoxFuture<'_, HostResult<Page>>;

    /// Write a modified page back. Either fully succeeds or fails.
    fn update_page(&self, page: &Page) -> BoxFuture<'_, HostResult<()>>;
}
