//! Forward-iteration state machine over all live records in a table.
//!
//! Tracks a `(bucket_index, current_record, traversed_count)` triple, plus
//! a sticky `exhausted` flag that only [`Cursor::reset`] (i.e.
//! `Table::reset_cursor`) clears. Kept as a plain state struct, separate
//! from [`crate::table::Table`], so the advance algorithm reads as its own
//! decision tree rather than being buried in method bodies.

use crate::arena::Arena;
use crate::bucket::{BucketArray, NULL};

pub(crate) struct Cursor {
    bucket_index: u32,
    current: u32,
    traversed: u32,
    exhausted: bool,
}

impl Cursor {
    pub(crate) fn new() -> Self {
        Self {
            bucket_index: 0,
            current: NULL,
            traversed: 0,
            exhausted: false,
        }
    }
}

/// Advances `cursor` by one record and returns its key/value, or `None`
/// once every live record has been visited (or the bucket array has been
/// exhausted first, which can only happen if `entry_count` disagrees with
/// reality).
///
/// Once exhausted, a cursor stays exhausted until reset. Repeated calls
/// after the end keep returning `None` rather than silently restarting.
pub(crate) fn advance<'a>(
    cursor: &mut Cursor,
    buckets: &BucketArray,
    arena: &'a Arena,
    bucket_count: u32,
    entry_count: u32,
) -> Option<(&'a [u8], &'a [u8])> {
    loop {
        if cursor.exhausted {
            return None;
        }
        if cursor.bucket_index >= bucket_count || cursor.traversed >= entry_count {
            cursor.exhausted = true;
            return None;
        }
        if cursor.current == NULL {
            cursor.current = buckets.head(cursor.bucket_index);
        }
        if cursor.current != NULL {
            let record = cursor.current;
            let key = arena.key(record);
            let value = arena.value(record);
            let next = arena.record_next(record);
            cursor.current = next;
            if next == NULL {
                cursor.bucket_index += 1;
            }
            cursor.traversed += 1;
            return Some((key, value));
        }
        cursor.bucket_index += 1;
    }
}
