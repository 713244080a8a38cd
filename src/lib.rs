//! A fixed-memory, separate-chaining hash table over a caller-supplied
//! byte buffer.
//!
//! [`Table`] performs no dynamic allocation once constructed: every key and
//! value it stores lives inside the `&mut [u8]` handed to [`Table::create`].
//! Internally the buffer is split into a reserved header region, a fixed
//! array of chain heads ([`bucket`]), and an arena ([`arena`]) that hands
//! out fixed-footprint records via a bump pointer backed by a first-fit
//! free list. Chain traversal ([`chain`]) and iteration ([`cursor`]) are
//! built on top of those two.

mod arena;
mod bucket;
mod chain;
pub mod config;
mod cursor;
pub mod error;
pub mod hasher;
mod header;
mod table;

pub use config::TableConfig;
pub use error::{CreateError, InsertError, RemoveError, RetrieveError};
pub use hasher::Hasher;
pub use table::Table;
