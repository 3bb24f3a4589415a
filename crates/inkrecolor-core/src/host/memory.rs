//! In-memory host implementation.

use super::{BoxFuture, HostError, HostResult, PageHost};
use crate::page::Page;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// In-memory host for testing and embedding.
///
/// Holds a single current page and counts how often it was written back.
#[derive(Default)]
pub struct MemoryHost {
    page: RwLock<Option<Page>>,
    updates: AtomicUsize,
    fail_updates: AtomicBool,
}

impl MemoryHost {
    /// Create a host with no current page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a host whose current page is `page`.
    pub fn with_page(page: Page) -> Self {
        Self {
            page: RwLock::new(Some(page)),
            ..Self::default()
        }
    }

    /// Current page contents.
    pub fn page(&self) -> Option<Page> {
        self.page.read().ok().and_then(|page| page.clone())
    }

    /// Number of successful `update_page` calls.
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    /// Make subsequent updates fail with an I/O error.
    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }
}

impl PageHost for MemoryHost {
    fn fetch_page(&self) -> BoxFuture<'_, HostResult<Page>> {
        Box::pin(async move {
            let page = self
                .page
                .read()
                .map_err(|e| HostError::Other(format!("Lock error: {}", e)))?;
            page.clone()
                .ok_or_else(|| HostError::NotFound("current page".to_string()))
        })
    }

    fn update_page(&self, page: &Page) -> BoxFuture<'_, HostResult<()>> {
        let page = page.clone();
        Box::pin(async move {
            if self.fail_updates.load(Ordering::SeqCst) {
                return Err(HostError::Io("update rejected".to_string()));
            }
            let mut current = self
                .page
                .write()
                .map_err(|e| HostError::Other(format!("Lock error: {}", e)))?;
            *current = Some(page);
            self.updates.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;

    #[test]
    fn test_fetch_and_update() {
        let host = MemoryHost::with_page(Page::new("p1"));
        let mut page = block_on(host.fetch_page()).unwrap();
        page.root.set_attribute("lang", "en-US");

        block_on(host.update_page(&page)).unwrap();

        assert_eq!(host.update_count(), 1);
        assert_eq!(host.page().unwrap().root.attribute("lang"), Some("en-US"));
    }

    #[test]
    fn test_not_found() {
        let host = MemoryHost::new();
        let result = block_on(host.fetch_page());
        assert!(matches!(result, Err(HostError::NotFound(_))));
    }

    #[test]
    fn test_failing_updates() {
        let host = MemoryHost::with_page(Page::new("p1"));
        host.set_fail_updates(true);

        let result = block_on(host.update_page(&Page::new("p2")));

        assert!(matches!(result, Err(HostError::Io(_))));
        assert_eq!(host.update_count(), 0);
        assert_eq!(host.page().unwrap().id, "p1");
    }
}
