//! Paged, address-stable row storage used by the component stores.

mod page;
#[allow(clippy::module_inception)]
mod pool;

pub use page::Page;
pub use pool::{PagedPool, PoolError};
