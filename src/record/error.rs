use crate::pager::PagerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Pager error: {0}")]
    Pager(#[from] PagerError),

    #[error("Table full: {max_rows} row limit reached")]
    TableFull { max_rows: usize },

    #[error("Value too long for {column}: {len} bytes exceeds {max}")]
    ValueTooLong {
        column: &'static str,
        len: usize,
        max: usize,
    },

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

pub type TableResult<T> = Result<T, TableError>;
