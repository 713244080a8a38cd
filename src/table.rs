//! The public `Table` type: a fixed-memory, separate-chaining hash table
//! carved entirely out of a caller-supplied byte buffer.
//!
//! No allocation happens after [`Table::create`] returns. Every operation
//! below it (`insert`, `remove`, `retrieve`, iteration) only ever moves
//! bytes around inside the buffer handed to `create`.

use crate::arena::{Arena, RECORD_HEADER_LEN};
use crate::bucket::BucketArray;
use crate::chain;
use crate::config::TableConfig;
use crate::cursor::{self, Cursor};
use crate::error::{CreateError, InsertError, RemoveError, RetrieveError};
use crate::hasher::Hasher;
use crate::header;

/// A hash table living entirely inside a `&'buf mut [u8]` borrowed for as
/// long as the table exists. See the module docs for the operations this
/// type exposes.
pub struct Table<'buf> {
    hasher: Hasher,
    bucket_count: u32,
    entry_count: u32,
    buckets_occupied: u32,
    validate_params: bool,
    cursor: Cursor,
    buckets: BucketArray<'buf>,
    arena: Arena<'buf>,
}

fn checked_len(n: usize, what: &'static str) -> Result<u32, &'static str> {
    if n > u32::MAX as usize {
        Err(what)
    } else {
        Ok(n as u32)
    }
}

impl<'buf> Table<'buf> {
    /// Carves a table out of `buffer` using `config`.
    ///
    /// `buffer` is split into a reserved header region, the bucket array,
    /// and the arena, in that order. A too-small buffer fails here with
    /// [`CreateError::BufferTooSmall`] rather than later on the first
    /// insert.
    pub fn create(buffer: &'buf mut [u8], config: TableConfig) -> Result<Self, CreateError> {
        if config.validate_params {
            if let Some(0) = config.bucket_count {
                return Err(CreateError::Invalid("bucket_count must be non-zero"));
            }
        }
        if buffer.len() > u32::MAX as usize {
            return Err(CreateError::Invalid("buffer larger than 4 GiB is not supported"));
        }

        let bucket_count = config
            .bucket_count
            .unwrap_or_else(|| header::default_bucket_count(buffer.len()));
        if bucket_count == 0 {
            return Err(CreateError::Invalid("bucket_count must be non-zero"));
        }

        let needed = header::min_buffer_size(bucket_count);
        if buffer.len() < needed {
            return Err(CreateError::BufferTooSmall {
                needed,
                available: buffer.len(),
            });
        }

        log::debug!(
            "creating table: {} buckets over a {}-byte buffer",
            bucket_count,
            buffer.len()
        );

        let (header_region, rest) = buffer.split_at_mut(header::HEADER_RESERVED_BYTES);
        header_region.fill(0);
        let bucket_bytes = bucket_count as usize * crate::bucket::BUCKET_LEN;
        let (bucket_region, arena_region) = rest.split_at_mut(bucket_bytes);

        Ok(Self {
            hasher: config.hasher,
            bucket_count,
            entry_count: 0,
            buckets_occupied: 0,
            validate_params: config.validate_params,
            cursor: Cursor::new(),
            buckets: BucketArray::new(bucket_region, bucket_count),
            arena: Arena::new(arena_region),
        })
    }

    /// [`Self::create`] with [`TableConfig::default`].
    pub fn create_default(buffer: &'buf mut [u8]) -> Result<Self, CreateError> {
        Self::create(buffer, TableConfig::default())
    }

    #[inline]
    fn bucket_index(&self, key: &[u8]) -> u32 {
        self.hasher.hash(key) % self.bucket_count
    }

    fn check_key(&self, key: &[u8]) -> Result<(), &'static str> {
        if self.validate_params && key.is_empty() {
            Err("key must be non-empty")
        } else {
            Ok(())
        }
    }

    /// Inserts `key`/`value`, or overwrites the existing value for `key` if
    /// it is already present.
    ///
    /// Overwriting with a value no longer than the one currently stored is
    /// the hot path: the bytes are rewritten in place and nothing is
    /// allocated. A longer value frees the old record and allocates a new
    /// one (a remove-then-reinsert), so the record that finally holds `key`
    /// may move even though the key itself didn't.
    pub fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), InsertError> {
        self.check_key(key).map_err(InsertError::Invalid)?;
        let key_len = checked_len(key.len(), "key exceeds the maximum representable length")
            .map_err(InsertError::Invalid)?;
        let value_len = checked_len(value.len(), "value exceeds the maximum representable length")
            .map_err(InsertError::Invalid)?;

        let index = self.bucket_index(key);
        if let Some((record, _)) = chain::find(&self.buckets, &self.arena, index, key) {
            if value_len <= self.arena.value_size(record) {
                self.arena.overwrite_value(record, value);
                log::trace!("insert: overwrote value in place for existing key");
                return Ok(());
            }
            self.remove_record_at(index, key);
        }

        let footprint = RECORD_HEADER_LEN as u64 + key_len as u64 + value_len as u64;
        if footprint > self.arena.total() as u64 {
            log::warn!("insert: requested record of {} bytes exceeds total arena capacity", footprint);
            return Err(InsertError::NoSpace);
        }
        let record = self.arena.allocate(footprint as u32).map_err(|_| {
            log::warn!(
                "insert: arena exhausted, {} bytes remaining, {} requested",
                self.arena.remaining(),
                footprint
            );
            InsertError::NoSpace
        })?;
        self.arena.init_record(record, key, value);
        let was_empty = chain::append(&mut self.buckets, &mut self.arena, index, record);
        if was_empty {
            self.buckets_occupied += 1;
        }
        self.entry_count += 1;
        Ok(())
    }

    /// Removes `key` if present and returns whether it was found. An absent
    /// key is not an error: "not found" is a routine outcome, distinct from
    /// "invalid" (a contract violation).
    pub fn remove(&mut self, key: &[u8]) -> Result<bool, RemoveError> {
        self.check_key(key).map_err(RemoveError::Invalid)?;
        let index = self.bucket_index(key);
        match chain::find(&self.buckets, &self.arena, index, key) {
            None => {
                log::trace!("remove: key not present");
                Ok(false)
            }
            Some(_) => {
                self.remove_record_at(index, key);
                Ok(true)
            }
        }
    }

    /// Unlinks and frees the record for `key` in bucket `index`. Assumes
    /// the key is present; callers must have already located it.
    fn remove_record_at(&mut self, index: u32, key: &[u8]) {
        let (record, predecessor) = chain::find(&self.buckets, &self.arena, index, key)
            .expect("remove_record_at called with an absent key");
        let became_empty = chain::unlink(&mut self.buckets, &mut self.arena, index, record, predecessor);
        self.arena.free(record);
        self.entry_count -= 1;
        if became_empty {
            self.buckets_occupied -= 1;
        }
    }

    /// Looks up `key`, returning its stored key/value bytes if present.
    pub fn retrieve(&self, key: &[u8]) -> Result<Option<(&[u8], &[u8])>, RetrieveError> {
        self.check_key(key).map_err(RetrieveError::Invalid)?;
        let index = self.bucket_index(key);
        Ok(chain::find(&self.buckets, &self.arena, index, key).map(|(record, _)| (self.arena.key(record), self.arena.value(record))))
    }

    /// Reports whether `key` is present, without exposing its value.
    pub fn has_key(&self, key: &[u8]) -> Result<bool, RetrieveError> {
        self.check_key(key).map_err(RetrieveError::Invalid)?;
        let index = self.bucket_index(key);
        Ok(chain::find(&self.buckets, &self.arena, index, key).is_some())
    }

    /// Bytes still available in the arena for new records. Monotonically
    /// non-increasing except across `remove` calls, which can only grow it
    /// via free-list reuse on a later `insert`, never via a shrink of the
    /// bump pointer.
    pub fn bytes_remaining(&self) -> u32 {
        self.arena.remaining()
    }

    /// Number of live key/value pairs.
    pub fn entry_count(&self) -> u32 {
        self.entry_count
    }

    /// Number of buckets with at least one live record.
    pub fn buckets_occupied(&self) -> u32 {
        self.buckets_occupied
    }

    /// Total number of buckets the table was created with.
    pub fn bucket_count(&self) -> u32 {
        self.bucket_count
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    /// Advances the iteration cursor and returns the next live key/value
    /// pair, or `None` once every record has been visited.
    ///
    /// The returned slices borrow from `self`; they must be dropped (or
    /// copied out) before the next mutating call. Once exhausted, the
    /// cursor stays exhausted until [`Self::reset_cursor`] is called: a
    /// call after the end keeps returning `None` rather than restarting.
    pub fn iter_next(&mut self) -> Option<(&[u8], &[u8])> {
        cursor::advance(&mut self.cursor, &self.buckets, &self.arena, self.bucket_count, self.entry_count)
    }

    /// Rewinds the iteration cursor to the start of bucket 0.
    pub fn reset_cursor(&mut self) {
        self.cursor = Cursor::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(size: usize) -> Vec<u8> {
        vec![0u8; size]
    }

    #[test]
    fn create_rejects_a_buffer_smaller_than_the_minimum() {
        let mut storage = buf(header::HEADER_RESERVED_BYTES + 10 * crate::bucket::BUCKET_LEN - 1);
        let config = TableConfig::default().with_bucket_count(10);
        let err = Table::create(&mut storage, config).unwrap_err();
        assert!(matches!(err, CreateError::BufferTooSmall { .. }));
    }

    #[test]
    fn create_succeeds_at_exactly_the_minimum_but_insert_has_no_space() {
        let needed = header::min_buffer_size(10);
        let mut storage = buf(needed);
        let config = TableConfig::default().with_bucket_count(10);
        let mut table = Table::create(&mut storage, config).unwrap();
        assert_eq!(table.bytes_remaining(), 0);
        assert_eq!(table.insert(b"k", b"v"), Err(InsertError::NoSpace));
    }

    #[test]
    fn insert_retrieve_and_remove_round_trip() {
        let mut storage = buf(4096);
        let mut table = Table::create_default(&mut storage).unwrap();
        table.insert(b"alpha", b"one").unwrap();
        table.insert(b"beta", b"two").unwrap();

        assert_eq!(table.retrieve(b"alpha").unwrap(), Some((b"alpha".as_ref(), b"one".as_ref())));
        assert_eq!(table.retrieve(b"beta").unwrap(), Some((b"beta".as_ref(), b"two".as_ref())));
        assert_eq!(table.retrieve(b"gamma").unwrap(), None);
        assert!(table.has_key(b"alpha").unwrap());
        assert!(!table.has_key(b"gamma").unwrap());

        assert_eq!(table.remove(b"alpha").unwrap(), true);
        assert_eq!(table.remove(b"alpha").unwrap(), false);
        assert_eq!(table.retrieve(b"alpha").unwrap(), None);
        assert_eq!(table.entry_count(), 1);
    }

    #[test]
    fn overwrite_with_a_shorter_value_reuses_the_record_in_place() {
        let mut storage = buf(4096);
        let mut table = Table::create_default(&mut storage).unwrap();
        table.insert(b"key", b"alpha").unwrap();
        let remaining_before = table.bytes_remaining();
        table.insert(b"key", b"beta").unwrap();
        assert_eq!(table.bytes_remaining(), remaining_before, "shrinking overwrite must not touch the arena");
        assert_eq!(table.retrieve(b"key").unwrap(), Some((b"key".as_ref(), b"beta".as_ref())));
        assert_eq!(table.entry_count(), 1);
    }

    #[test]
    fn overwrite_with_a_longer_value_consumes_more_arena_space() {
        let mut storage = buf(4096);
        let mut table = Table::create_default(&mut storage).unwrap();
        table.insert(b"key", b"12345").unwrap();
        let remaining_before = table.bytes_remaining();
        table.insert(b"key", b"123456").unwrap();
        assert!(table.bytes_remaining() < remaining_before, "growing overwrite must allocate a new record");
        assert_eq!(table.retrieve(b"key").unwrap(), Some((b"key".as_ref(), b"123456".as_ref())));
        assert_eq!(table.entry_count(), 1);
    }

    #[test]
    fn iteration_visits_every_key_exactly_once_then_ends() {
        let mut storage = buf(4096);
        let mut table = Table::create_default(&mut storage).unwrap();
        let pairs = [(b"k1".as_ref(), b"v1".as_ref()), (b"k2", b"v2"), (b"k3", b"v3"), (b"k4", b"v4")];
        for (k, v) in &pairs {
            table.insert(k, v).unwrap();
        }

        let mut seen = std::collections::BTreeSet::new();
        while let Some((k, v)) = table.iter_next() {
            seen.insert((k.to_vec(), v.to_vec()));
        }
        assert_eq!(seen.len(), 4);
        assert!(table.iter_next().is_none(), "cursor should stay exhausted");

        table.reset_cursor();
        let mut count = 0;
        while table.iter_next().is_some() {
            count += 1;
        }
        assert_eq!(count, 4);
    }

    #[test]
    fn empty_key_is_rejected_when_validation_is_enabled() {
        let mut storage = buf(4096);
        let mut table = Table::create_default(&mut storage).unwrap();
        assert_eq!(table.insert(b"", b"v"), Err(InsertError::Invalid("key must be non-empty")));
    }

    #[test]
    fn empty_key_is_allowed_when_validation_is_disabled() {
        let mut storage = buf(4096);
        let mut table = Table::create(&mut storage, TableConfig::default().without_validation()).unwrap();
        assert!(table.insert(b"", b"v").is_ok());
        assert_eq!(table.retrieve(b"").unwrap(), Some((b"".as_ref(), b"v".as_ref())));
    }

    #[test]
    fn zero_length_value_round_trips() {
        let mut storage = buf(4096);
        let mut table = Table::create_default(&mut storage).unwrap();
        table.insert(b"key", b"").unwrap();
        assert_eq!(table.retrieve(b"key").unwrap(), Some((b"key".as_ref(), b"".as_ref())));
    }

    #[test]
    fn single_bucket_exhausts_after_two_large_keys() {
        let mut storage = buf(512);
        let config = TableConfig::default().with_bucket_count(1);
        let mut table = Table::create(&mut storage, config).unwrap();
        // Arena is 512 - 32 (header) - 8 (one bucket) = 472 bytes; each
        // 256-byte key costs 16 + 256 = 272 bytes, so the first insert fits
        // but the second (272 * 2 = 544 > 472) cannot.
        let big_key = vec![1u8; 256];
        let other_key = vec![2u8; 256];
        table.insert(&big_key, &[]).unwrap();
        let result = table.insert(&other_key, &[]);
        assert_eq!(result, Err(InsertError::NoSpace));
    }
}
