mod error;
mod row;
mod table;

pub use error::{TableError, TableResult};
pub use row::{EMAIL_SIZE, ROW_SIZE, Row, USERNAME_SIZE};
pub use table::{MAX_ROWS, ROWS_PER_PAGE, Scan, Table};
