mod error;
mod pager;

pub use error::{PagerError, PagerResult};
pub use pager::Pager;

/// Page size in bytes (4KB)
pub const PAGE_SIZE: usize = 4096;

/// Hard ceiling on the number of pages in a database file
pub const MAX_PAGES: usize = 100;

/// Page ID type
pub type PageId = usize;
