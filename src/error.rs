use thiserror::Error;

/// Errors raised by [`crate::Table::create`].
///
/// `BufferTooSmall` and `Invalid` are kept distinct because callers branch on
/// them differently: the former is a capacity problem the caller can fix by
/// handing over a bigger buffer, the latter is a programmer error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CreateError {
    #[error("buffer too small: need at least {needed} bytes, got {available}")]
    BufferTooSmall { needed: usize, available: usize },
    #[error("invalid argument: {0}")]
    Invalid(&'static str),
}

/// Errors raised by [`crate::Table::insert`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InsertError {
    #[error("arena exhausted: no space for a record of this size")]
    NoSpace,
    #[error("invalid argument: {0}")]
    Invalid(&'static str),
}

/// Errors raised by [`crate::Table::remove`].
///
/// An absent key is not an error (see [`crate::Table::remove`]'s return
/// value); this type only covers genuine contract violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoveError {
    #[error("invalid argument: {0}")]
    Invalid(&'static str),
}

/// Errors raised by [`crate::Table::retrieve`] and [`crate::Table::has_key`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetrieveError {
    #[error("invalid argument: {0}")]
    Invalid(&'static str),
}
