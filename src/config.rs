//! Construction-time configuration for a [`crate::Table`].
//!
//! Mirrors the shape of a small `Default`-able config struct the way the
//! rest of this codebase configures non-functional behavior: a struct of
//! knobs, all with sane defaults, passed once at construction.

use crate::hasher::Hasher;

/// Configuration accepted by [`crate::Table::create`].
///
/// `validate_params` toggles precondition checking (empty keys, zero
/// bucket count) at runtime, so a single build can be exercised both with
/// and without validation.
#[derive(Clone, Copy)]
pub struct TableConfig {
    /// Hash function used to select a key's bucket. Defaults to FNV-1a.
    pub hasher: Hasher,
    /// Explicit bucket count. `None` derives one so the bucket array
    /// occupies roughly 12% of the buffer, with a floor of 10 buckets.
    pub bucket_count: Option<u32>,
    /// Whether to check preconditions (null/zero-length keys, zero bucket
    /// count) and report them as `Invalid` instead of leaving them as
    /// caller-upheld invariants. Defaults to `true`.
    pub validate_params: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            hasher: Hasher::default(),
            bucket_count: None,
            validate_params: true,
        }
    }
}

impl TableConfig {
    /// Start from the default config and override the hasher.
    pub fn with_hasher(mut self, hasher: Hasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Start from the default config and pin an explicit bucket count.
    pub fn with_bucket_count(mut self, bucket_count: u32) -> Self {
        self.bucket_count = Some(bucket_count);
        self
    }

    /// Start from the default config with parameter validation disabled.
    pub fn without_validation(mut self) -> Self {
        self.validate_params = false;
        self
    }
}
