use std::io;
use thiserror::Error;

use super::PageId;

#[derive(Debug, Error)]
pub enum PagerError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Page number out of bounds: {page_id} >= {max_pages}")]
    PageOutOfBounds { page_id: PageId, max_pages: usize },

    #[error("Tried to flush a page that was never loaded: page_id={0}")]
    FlushMissingPage(PageId),
}

pub type PagerResult<T> = Result<T, PagerError>;
