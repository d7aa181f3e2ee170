use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use super::error::{PagerError, PagerResult};
use super::{MAX_PAGES, PAGE_SIZE, PageId};

/// A page resident in memory
struct PageSlot {
    /// The page bytes (always PAGE_SIZE long)
    data: Vec<u8>,
    /// Whether the buffer has been modified since it was materialized
    dirty: bool,
}

/// Owns the database file and the residency of its pages.
///
/// Each page slot starts absent and is materialized on first access, either
/// from disk or as a fresh zeroed buffer. Once resident, a page is the
/// authoritative copy until flushed; it is never evicted or re-read.
pub struct Pager {
    file: File,
    /// File length in bytes, as observed at open time
    file_length: u64,
    /// Indexed arena of page slots, absent until first touch
    pages: Vec<Option<PageSlot>>,
}

impl Pager {
    /// Open the database file, creating it if it does not exist
    pub fn open<P: AsRef<Path>>(path: P) -> PagerResult<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        let file_length = file.metadata()?.len();

        let mut pages = Vec::new();
        pages.resize_with(MAX_PAGES, || None);

        tracing::debug!("opened {} ({} bytes)", path.display(), file_length);

        Ok(Self {
            file,
            file_length,
            pages,
        })
    }

    /// File length in bytes as observed when the pager was opened
    pub fn file_length(&self) -> u64 {
        self.file_length
    }

    /// Number of pages with at least one byte on disk
    fn pages_on_disk(&self) -> usize {
        (self.file_length as usize).div_ceil(PAGE_SIZE)
    }

    /// Get a shared reference to a page, materializing it if absent
    pub fn get_page(&mut self, page_id: PageId) -> PagerResult<&[u8]> {
        self.materialize(page_id)?;
        Ok(&self.pages[page_id].as_ref().unwrap().data)
    }

    /// Get a mutable reference to a page, materializing it if absent.
    /// The page is marked dirty.
    pub fn get_page_mut(&mut self, page_id: PageId) -> PagerResult<&mut [u8]> {
        self.materialize(page_id)?;
        let slot = self.pages[page_id].as_mut().unwrap();
        slot.dirty = true;
        Ok(&mut slot.data)
    }

    /// Check if a page is currently resident in memory
    pub fn is_page_resident(&self, page_id: PageId) -> bool {
        self.pages.get(page_id).is_some_and(|slot| slot.is_some())
    }

    /// Check if a resident page has unflushed modifications
    pub fn is_page_dirty(&self, page_id: PageId) -> bool {
        self.pages
            .get(page_id)
            .and_then(|slot| slot.as_ref())
            .is_some_and(|slot| slot.dirty)
    }

    /// Load a page into its slot on first touch; no-op if already resident
    fn materialize(&mut self, page_id: PageId) -> PagerResult<()> {
        if page_id >= MAX_PAGES {
            return Err(PagerError::PageOutOfBounds {
                page_id,
                max_pages: MAX_PAGES,
            });
        }

        if self.pages[page_id].is_some() {
            return Ok(());
        }

        let mut data = vec![0u8; PAGE_SIZE];

        if page_id < self.pages_on_disk() {
            let offset = (page_id * PAGE_SIZE) as u64;
            self.file.seek(SeekFrom::Start(offset))?;
            // A short read is the final partial page; the tail stays zeroed
            let bytes_read = self.file.read(&mut data)?;
            tracing::debug!("loaded page {} from disk ({} bytes)", page_id, bytes_read);
        } else {
            tracing::debug!("materialized fresh page {}", page_id);
        }

        self.pages[page_id] = Some(PageSlot { data, dirty: false });
        Ok(())
    }

    /// Write exactly `byte_count` bytes of a resident page back to its file
    /// offset and clear its dirty flag. Flushing an absent page is an error:
    /// it signals a broken close protocol in the caller.
    pub fn flush_page(&mut self, page_id: PageId, byte_count: usize) -> PagerResult<()> {
        let slot = self
            .pages
            .get_mut(page_id)
            .and_then(|slot| slot.as_mut())
            .ok_or(PagerError::FlushMissingPage(page_id))?;

        let offset = (page_id * PAGE_SIZE) as u64;
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(&slot.data[..byte_count])?;
        slot.dirty = false;

        tracing::debug!("flushed page {} ({} bytes)", page_id, byte_count);
        Ok(())
    }

    /// Sync written pages to disk (flush OS buffers)
    pub fn sync(&mut self) -> PagerResult<()> {
        self.file.sync_data()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        (dir, path)
    }

    #[test]
    fn test_open_creates_file() {
        let (_dir, path) = setup();
        let pager = Pager::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(pager.file_length(), 0);
    }

    #[test]
    fn test_open_existing_file_keeps_contents() {
        let (_dir, path) = setup();
        fs::write(&path, vec![3u8; 200]).unwrap();

        let mut pager = Pager::open(&path).unwrap();
        assert_eq!(pager.file_length(), 200);
        assert_eq!(pager.get_page(0).unwrap()[..200], [3u8; 200]);
    }

    #[test]
    fn test_fresh_page_is_zeroed() {
        let (_dir, path) = setup();
        let mut pager = Pager::open(&path).unwrap();

        let page = pager.get_page(3).unwrap();
        assert_eq!(page.len(), PAGE_SIZE);
        assert!(page.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_page_out_of_bounds() {
        let (_dir, path) = setup();
        let mut pager = Pager::open(&path).unwrap();

        let result = pager.get_page(MAX_PAGES);
        assert!(matches!(
            result,
            Err(PagerError::PageOutOfBounds { page_id, .. }) if page_id == MAX_PAGES
        ));
    }

    #[test]
    fn test_residency_tracking() {
        let (_dir, path) = setup();
        let mut pager = Pager::open(&path).unwrap();

        assert!(!pager.is_page_resident(0));
        pager.get_page(0).unwrap();
        assert!(pager.is_page_resident(0));
        assert!(!pager.is_page_resident(1));
    }

    #[test]
    fn test_resident_page_is_authoritative() {
        let (_dir, path) = setup();
        fs::write(&path, vec![7u8; PAGE_SIZE]).unwrap();

        let mut pager = Pager::open(&path).unwrap();
        assert_eq!(pager.get_page(0).unwrap()[0], 7);

        // Overwrite the file behind the pager's back; the resident copy wins
        fs::write(&path, vec![9u8; PAGE_SIZE]).unwrap();
        assert_eq!(pager.get_page(0).unwrap()[0], 7);
    }

    #[test]
    fn test_short_read_zero_fills_tail() {
        let (_dir, path) = setup();
        fs::write(&path, vec![5u8; 100]).unwrap();

        let mut pager = Pager::open(&path).unwrap();
        let page = pager.get_page(0).unwrap();
        assert!(page[..100].iter().all(|&b| b == 5));
        assert!(page[100..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_get_page_mut_marks_dirty() {
        let (_dir, path) = setup();
        let mut pager = Pager::open(&path).unwrap();

        pager.get_page(0).unwrap();
        assert!(!pager.is_page_dirty(0));

        pager.get_page_mut(0).unwrap()[0] = 42;
        assert!(pager.is_page_dirty(0));

        pager.flush_page(0, PAGE_SIZE).unwrap();
        assert!(!pager.is_page_dirty(0));
    }

    #[test]
    fn test_flush_missing_page() {
        let (_dir, path) = setup();
        let mut pager = Pager::open(&path).unwrap();

        let result = pager.flush_page(0, PAGE_SIZE);
        assert!(matches!(result, Err(PagerError::FlushMissingPage(0))));
    }

    #[test]
    fn test_flush_writes_exact_byte_count() {
        let (_dir, path) = setup();
        let mut pager = Pager::open(&path).unwrap();

        pager.get_page_mut(0).unwrap()[..300].fill(1);
        pager.flush_page(0, 300).unwrap();
        pager.sync().unwrap();

        assert_eq!(fs::read(&path).unwrap(), vec![1u8; 300]);
    }

    #[test]
    fn test_flush_at_page_offset() {
        let (_dir, path) = setup();
        let mut pager = Pager::open(&path).unwrap();

        pager.get_page_mut(0).unwrap().fill(1);
        pager.get_page_mut(1).unwrap()[..10].fill(2);
        pager.flush_page(0, PAGE_SIZE).unwrap();
        pager.flush_page(1, 10).unwrap();

        let contents = fs::read(&path).unwrap();
        assert_eq!(contents.len(), PAGE_SIZE + 10);
        assert!(contents[..PAGE_SIZE].iter().all(|&b| b == 1));
        assert_eq!(&contents[PAGE_SIZE..], &[2u8; 10]);
    }

    #[test]
    fn test_flushed_page_survives_reopen() {
        let (_dir, path) = setup();

        {
            let mut pager = Pager::open(&path).unwrap();
            pager.get_page_mut(0).unwrap()[10] = 88;
            pager.flush_page(0, PAGE_SIZE).unwrap();
            pager.sync().unwrap();
        }

        let mut pager = Pager::open(&path).unwrap();
        assert_eq!(pager.get_page(0).unwrap()[10], 88);
    }
}
