use crate::pool::PoolError;

/// Fixed-size block of rows. Allocated once, filled with defaults and never
/// resized, so a reference into it stays valid while the page lives.
pub struct Page<T> {
    rows: Box<[T]>,
}

impl<T: Default> Page<T> {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            rows: std::iter::repeat_with(T::default).take(cap).collect(),
        }
    }
}

impl<T> Page<T> {
    #[inline]
    pub fn capacity(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Result<&T, PoolError> {
        let len = self.rows.len();
        self.rows
            .get(idx)
            .ok_or(PoolError::IndexOutOfBounds { index: idx, len })
    }

    #[inline]
    pub fn get_mut(&mut self, idx: usize) -> Result<&mut T, PoolError> {
        let len = self.rows.len();
        self.rows
            .get_mut(idx)
            .ok_or(PoolError::IndexOutOfBounds { index: idx, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_is_filled_with_defaults() {
        let page = Page::<u16>::with_capacity(3);
        assert_eq!(page.capacity(), 3);
        assert_eq!(*page.get(2).unwrap(), 0);
    }

    #[test]
    fn out_of_range_row_is_an_error() {
        let mut page = Page::<u16>::with_capacity(3);
        assert_eq!(
            page.get_mut(3).err(),
            Some(PoolError::IndexOutOfBounds { index: 3, len: 3 })
        );
    }
}
