//! Per-bucket chain operations: linear search, tail append, and unlink.
//!
//! Kept as free functions over [`BucketArray`] and [`Arena`] rather than
//! methods on `Table`, separating the chain-walking algorithms from the
//! operations that call them.

use crate::arena::Arena;
use crate::bucket::{BucketArray, NULL};

/// Walks bucket `index`'s chain looking for `key`. Returns the matching
/// record's offset together with its predecessor's offset (`None` if it's
/// the chain head), or `None` if no record in the chain has this key.
///
/// Always advances to the next record regardless of why the current one
/// didn't match, so a chain containing keys of mismatched length can never
/// loop in place.
pub(crate) fn find(buckets: &BucketArray, arena: &Arena, index: u32, key: &[u8]) -> Option<(u32, Option<u32>)> {
    let mut prev = None;
    let mut cur = buckets.head(index);
    while cur != NULL {
        if arena.key(cur) == key {
            return Some((cur, prev));
        }
        prev = Some(cur);
        cur = arena.record_next(cur);
    }
    None
}

/// Appends `record` to the tail of bucket `index`'s chain. Returns `true`
/// if the bucket was empty beforehand (the caller uses this to keep
/// `buckets_occupied` accurate).
pub(crate) fn append(buckets: &mut BucketArray, arena: &mut Arena, index: u32, record: u32) -> bool {
    arena.set_record_next(record, NULL);
    let tail = buckets.tail(index);
    let was_empty = tail == NULL;
    if was_empty {
        buckets.set_head(index, record);
    } else {
        arena.set_record_next(tail, record);
    }
    buckets.set_tail(index, record);
    was_empty
}

/// Removes `record` from bucket `index`'s chain, given its predecessor (as
/// returned by [`find`]). Returns `true` if the bucket is now empty.
pub(crate) fn unlink(buckets: &mut BucketArray, arena: &mut Arena, index: u32, record: u32, predecessor: Option<u32>) -> bool {
    let next = arena.record_next(record);
    match predecessor {
        Some(p) => arena.set_record_next(p, next),
        None => buckets.set_head(index, next),
    }
    if buckets.tail(index) == record {
        buckets.set_tail(index, predecessor.unwrap_or(NULL));
    }
    arena.set_record_next(record, NULL);
    buckets.head(index) == NULL
}
