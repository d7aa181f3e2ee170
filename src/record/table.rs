use std::path::Path;

use super::error::{TableError, TableResult};
use super::row::{ROW_SIZE, Row};
use crate::pager::{MAX_PAGES, PAGE_SIZE, PageId, Pager};

/// Whole rows per page; the remainder bytes at the end of each page are
/// unused, so a row never straddles a page boundary
pub const ROWS_PER_PAGE: usize = PAGE_SIZE / ROW_SIZE;

/// Hard ceiling on table size, derived from the fixed page arena
pub const MAX_ROWS: usize = ROWS_PER_PAGE * MAX_PAGES;

/// A table of rows backed by a pager.
///
/// The table owns the pager exclusively and tracks the logical row count,
/// which bounds every scan; page residency never feeds back into it.
pub struct Table {
    pager: Pager,
    num_rows: usize,
}

impl Table {
    /// Open the table file at `path`, creating it if it does not exist.
    /// The row count is derived from the on-disk file length.
    pub fn open<P: AsRef<Path>>(path: P) -> TableResult<Self> {
        let pager = Pager::open(path)?;
        let num_rows = row_count_for_length(pager.file_length());
        tracing::debug!("opened table with {} rows", num_rows);

        Ok(Self { pager, num_rows })
    }

    /// Number of valid rows appended so far
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Append a row at the end of the table. May materialize a new page as
    /// a side effect of addressing the slot.
    pub fn append(&mut self, row: &Row) -> TableResult<()> {
        if self.num_rows >= MAX_ROWS {
            return Err(TableError::TableFull { max_rows: MAX_ROWS });
        }

        let (page_id, offset) = row_location(self.num_rows);
        let page = self.pager.get_page_mut(page_id)?;
        row.serialize_into(&mut page[offset..offset + ROW_SIZE]);
        self.num_rows += 1;

        Ok(())
    }

    /// Iterate over all rows in insertion order. The scan is lazy: pages
    /// are materialized as the iterator reaches them. Call again for a
    /// fresh pass.
    pub fn scan(&mut self) -> Scan<'_> {
        Scan {
            table: self,
            next_row: 0,
        }
    }

    fn read_row(&mut self, row_index: usize) -> TableResult<Row> {
        let (page_id, offset) = row_location(row_index);
        let page = self.pager.get_page(page_id)?;
        Row::deserialize(&page[offset..offset + ROW_SIZE])
    }

    /// Flush every modified page holding valid rows, then sync the file.
    ///
    /// Full pages are written whole; the trailing partial page is written
    /// only up to its last valid row so no garbage lands past it. Pages that
    /// were never materialized or never modified are skipped: their on-disk
    /// copy, if any, is already correct.
    fn flush_pages(&mut self) -> TableResult<()> {
        let full_pages = self.num_rows / ROWS_PER_PAGE;
        for page_id in 0..full_pages {
            if self.pager.is_page_dirty(page_id) {
                self.pager.flush_page(page_id, PAGE_SIZE)?;
            }
        }

        let trailing_rows = self.num_rows % ROWS_PER_PAGE;
        if trailing_rows > 0 && self.pager.is_page_dirty(full_pages) {
            self.pager.flush_page(full_pages, trailing_rows * ROW_SIZE)?;
        }

        self.pager.sync()?;
        Ok(())
    }

    /// Flush all valid rows to disk and release the table. Page buffers and
    /// the file handle are released when the pager drops, flushed or not.
    pub fn close(mut self) -> TableResult<()> {
        tracing::debug!("closing table with {} rows", self.num_rows);
        self.flush_pages()
    }
}

impl Drop for Table {
    fn drop(&mut self) {
        // Best-effort flush for tables dropped without an explicit close
        let _ = self.flush_pages();
    }
}

/// Pure address translation: which page a row lives in and the byte offset
/// of its slot within that page
fn row_location(row_index: usize) -> (PageId, usize) {
    let page_id = row_index / ROWS_PER_PAGE;
    let byte_offset = (row_index % ROWS_PER_PAGE) * ROW_SIZE;
    (page_id, byte_offset)
}

/// Derive the row count from the on-disk length. Full pages carry
/// ROWS_PER_PAGE rows each (their padding bytes belong to the page, not to
/// any row); whatever whole rows fit in the trailing bytes follow. Trailing
/// bytes short of a whole row are ignored.
fn row_count_for_length(file_length: u64) -> usize {
    let file_length = file_length as usize;
    let full_pages = file_length / PAGE_SIZE;
    let trailing_bytes = file_length % PAGE_SIZE;
    full_pages * ROWS_PER_PAGE + trailing_bytes / ROW_SIZE
}

/// Lazy in-order scan over a table's rows
pub struct Scan<'a> {
    table: &'a mut Table,
    next_row: usize,
}

impl Iterator for Scan<'_> {
    type Item = TableResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_row >= self.table.num_rows {
            return None;
        }

        let row = self.table.read_row(self.next_row);
        self.next_row += 1;
        Some(row)
    }
}
