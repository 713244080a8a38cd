//! The record allocator: bump pointer plus a first-fit, FIFO-ordered free
//! list, carved out of a single byte slice. No splitting, no coalescing, no
//! compaction.
//!
//! Record layout (little-endian, [`RECORD_HEADER_LEN`] bytes of header):
//!
//! ```text
//! [ next: u32 | capacity: u32 | key_size: u32 | value_size: u32 | key bytes | value bytes ]
//! ```
//!
//! `capacity` records a record's original allocation footprint and is set
//! once, when the record is allocated, never touched again. `key_size` and
//! `value_size` shrink in place on the hot overwrite path (see
//! [`crate::table::Table::insert`]), so the free list matches candidates
//! against `capacity` rather than re-deriving a footprint from those two
//! fields, which a shrunk-then-freed record would under-report.

use crate::bucket::NULL;

pub(crate) const RECORD_HEADER_LEN: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AllocError {
    NoSpace,
}

pub(crate) struct Arena<'buf> {
    buf: &'buf mut [u8],
    used: u32,
    free_head: u32,
    total: u32,
}

impl<'buf> Arena<'buf> {
    pub(crate) fn new(buf: &'buf mut [u8]) -> Self {
        let total = buf.len() as u32;
        Self {
            buf,
            used: 0,
            free_head: NULL,
            total,
        }
    }

    #[inline]
    pub(crate) fn total(&self) -> u32 {
        self.total
    }

    #[inline]
    pub(crate) fn remaining(&self) -> u32 {
        self.total - self.used
    }

    fn read_u32(&self, record: u32, field_offset: u32) -> u32 {
        let off = (record + field_offset) as usize;
        u32::from_le_bytes(self.buf[off..off + 4].try_into().unwrap())
    }

    fn write_u32(&mut self, record: u32, field_offset: u32, value: u32) {
        let off = (record + field_offset) as usize;
        self.buf[off..off + 4].copy_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub(crate) fn record_next(&self, record: u32) -> u32 {
        self.read_u32(record, 0)
    }

    #[inline]
    pub(crate) fn set_record_next(&mut self, record: u32, next: u32) {
        self.write_u32(record, 0, next);
    }

    #[inline]
    fn capacity(&self, record: u32) -> u32 {
        self.read_u32(record, 4)
    }

    #[inline]
    fn set_capacity(&mut self, record: u32, capacity: u32) {
        self.write_u32(record, 4, capacity);
    }

    #[inline]
    pub(crate) fn key_size(&self, record: u32) -> u32 {
        self.read_u32(record, 8)
    }

    #[inline]
    fn set_key_size(&mut self, record: u32, size: u32) {
        self.write_u32(record, 8, size);
    }

    #[inline]
    pub(crate) fn value_size(&self, record: u32) -> u32 {
        self.read_u32(record, 12)
    }

    #[inline]
    fn set_value_size(&mut self, record: u32, size: u32) {
        self.write_u32(record, 12, size);
    }

    #[inline]
    fn key_start(&self, record: u32) -> usize {
        (record + RECORD_HEADER_LEN) as usize
    }

    pub(crate) fn key(&self, record: u32) -> &[u8] {
        let start = self.key_start(record);
        let len = self.key_size(record) as usize;
        &self.buf[start..start + len]
    }

    pub(crate) fn value(&self, record: u32) -> &[u8] {
        let start = self.key_start(record) + self.key_size(record) as usize;
        let len = self.value_size(record) as usize;
        &self.buf[start..start + len]
    }

    /// Writes a freshly (re)used record's key and value in full, overwriting
    /// whatever `key_size`/`value_size` previously held. `capacity` is left
    /// untouched; it is set once by [`Self::allocate`] and never changes
    /// afterward.
    pub(crate) fn init_record(&mut self, record: u32, key: &[u8], value: &[u8]) {
        self.set_key_size(record, key.len() as u32);
        self.set_value_size(record, value.len() as u32);
        let key_start = self.key_start(record);
        self.buf[key_start..key_start + key.len()].copy_from_slice(key);
        if !value.is_empty() {
            let value_start = key_start + key.len();
            self.buf[value_start..value_start + value.len()].copy_from_slice(value);
        }
    }

    /// Overwrites a live record's value bytes in place. Caller must ensure
    /// `new_value.len() <= self.value_size(record)`; this is the hot path
    /// guarded by that check in [`crate::table::Table::insert`].
    pub(crate) fn overwrite_value(&mut self, record: u32, new_value: &[u8]) {
        debug_assert!(new_value.len() as u32 <= self.value_size(record));
        let start = self.key_start(record) + self.key_size(record) as usize;
        self.buf[start..start + new_value.len()].copy_from_slice(new_value);
        self.set_value_size(record, new_value.len() as u32);
    }

    /// Returns the first free-list record whose original footprint is large
    /// enough, or bump-allocates a fresh one from the unused tail of the
    /// arena. Searches the free list before bump-allocating.
    pub(crate) fn allocate(&mut self, size_required: u32) -> Result<u32, AllocError> {
        let mut prev: Option<u32> = None;
        let mut cur = self.free_head;
        while cur != NULL {
            let next = self.record_next(cur);
            if self.capacity(cur) >= size_required {
                match prev {
                    Some(p) => self.set_record_next(p, next),
                    None => self.free_head = next,
                }
                self.set_record_next(cur, NULL);
                return Ok(cur);
            }
            prev = Some(cur);
            cur = next;
        }

        if self.used.checked_add(size_required).map_or(true, |end| end > self.total) {
            return Err(AllocError::NoSpace);
        }
        let record = self.used;
        self.used += size_required;
        self.set_record_next(record, NULL);
        self.set_capacity(record, size_required);
        self.set_key_size(record, 0);
        self.set_value_size(record, 0);
        Ok(record)
    }

    /// Returns a live record to the free list, FIFO (appended to the tail),
    /// so records that sat unused longest are reused first.
    pub(crate) fn free(&mut self, record: u32) {
        self.set_record_next(record, NULL);
        if self.free_head == NULL {
            self.free_head = record;
            return;
        }
        let mut cur = self.free_head;
        loop {
            let next = self.record_next(cur);
            if next == NULL {
                break;
            }
            cur = next;
        }
        self.set_record_next(cur, record);
    }
}
