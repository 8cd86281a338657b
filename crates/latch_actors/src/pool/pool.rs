use crate::pool::page::Page;
use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("page {page} has not been allocated")]
    PageMissing { page: usize },
    #[error("row {index} out of bounds for page of {len} rows")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Pool that hides individual pages and acts like a contiguous array.
///
/// Pages are only ever appended. A value's address stays put for as long as
/// the pool lives, no matter how many pages are added after it.
pub struct PagedPool<T> {
    rows_per_page: usize,
    shift: u32,
    mask: usize,
    pages: Vec<Page<T>>,
}

impl<T> PagedPool<T> {
    pub fn with_rows_per_page(rows_per_page: usize) -> Self {
        assert!(rows_per_page.is_power_of_two() && rows_per_page > 0);
        Self {
            rows_per_page,
            shift: rows_per_page.trailing_zeros(),
            mask: rows_per_page - 1,
            pages: Vec::new(),
        }
    }

    #[inline]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Total number of addressable rows across every page.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.pages.len() * self.rows_per_page
    }

    #[inline]
    fn page_of(&self, gidx: usize) -> usize {
        gidx >> self.shift
    }

    #[inline]
    fn local_of(&self, gidx: usize) -> usize {
        gidx & self.mask
    }

    pub fn get(&self, gidx: usize) -> Result<&T, PoolError> {
        let page = self.page_of(gidx);
        self.pages
            .get(page)
            .ok_or(PoolError::PageMissing { page })?
            .get(self.local_of(gidx))
    }

    pub fn get_mut(&mut self, gidx: usize) -> Result<&mut T, PoolError> {
        let page = self.page_of(gidx);
        let local = self.local_of(gidx);
        self.pages
            .get_mut(page)
            .ok_or(PoolError::PageMissing { page })?
            .get_mut(local)
    }
}

impl<T: Default> PagedPool<T> {
    /// Append one page of default rows; returns the global indices it covers.
    pub fn push_page(&mut self) -> Range<usize> {
        let start = self.capacity();
        self.pages.push(Page::with_capacity(self.rows_per_page));
        start..start + self.rows_per_page
    }

    /// Reset the row at `gidx` to `T::default()`, returning the old value.
    pub fn take(&mut self, gidx: usize) -> Result<T, PoolError> {
        self.get_mut(gidx).map(std::mem::take)
    }
}
