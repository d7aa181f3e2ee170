pub mod command;
pub mod pager;
pub mod record;

pub use command::{MetaCommand, PrepareError, Statement};
pub use pager::{MAX_PAGES, PAGE_SIZE, PageId, Pager, PagerError, PagerResult};
pub use record::{
    EMAIL_SIZE, MAX_ROWS, ROW_SIZE, ROWS_PER_PAGE, Row, Scan, Table, TableError, TableResult,
    USERNAME_SIZE,
};
