//! Header layout: the leaf subsystem everything else is carved out under.
//!
//! Configuration, counters, and the cursor live as ordinary (and therefore
//! safe, bounds-checked-by-construction) Rust struct fields on
//! [`crate::Table`] rather than inside the buffer. What is still carved out
//! of the caller's buffer is a fixed, zeroed reservation matching that
//! header's byte footprint, so the minimum-buffer-size arithmetic stays
//! consistent regardless of how much state the header actually holds.

use crate::bucket::BUCKET_LEN;

/// Bytes reserved at the front of the buffer for the (unused, zeroed)
/// header region. Kept only to preserve the original layout's size budget.
pub(crate) const HEADER_RESERVED_BYTES: usize = 32;

/// Minimum buffer size accepted by [`crate::Table::create`] for a given
/// bucket count: header region + bucket array, with zero bytes left over
/// for the arena, so `create` succeeds but the very first `insert` reports
/// `NoSpace`.
pub(crate) fn min_buffer_size(bucket_count: u32) -> usize {
    HEADER_RESERVED_BYTES + bucket_count as usize * BUCKET_LEN
}

/// Derives a default bucket count so the bucket array occupies roughly 12%
/// of the buffer, with a floor of 10 buckets.
pub(crate) fn default_bucket_count(buffer_len: usize) -> u32 {
    let target_bytes = (buffer_len as f64 * 0.12) as usize;
    let n = (target_bytes / BUCKET_LEN).max(10);
    n.min(u32::MAX as usize) as u32
}
