//! chained-table: a single-threaded, string-keyed hash table using
//! separate chaining, with caller-owned values.
//!
//! Internal Design:
//!
//! Summary
//! - `ChainedTable<V, H>` owns a bucket array of chain heads, an entry
//!   arena, and a pluggable `KeyHasher`.
//! - Entries live in a `SlotMap`; each bucket stores the arena key of its
//!   chain head and each entry stores the key of its successor. Insert
//!   prepends, lookup scans linearly, delete unlinks through the
//!   predecessor.
//!
//! Ownership
//! - The table copies every key into a private `Box<str>` and frees it on
//!   delete or teardown.
//! - Values are caller handles (`&T`, an index, an `Rc`, ...). The table
//!   never clones them; a handle leaves the table through `delete`, a
//!   failed `insert` (inside `InsertError`), or the `destroy_with`
//!   callback.
//!
//! Growth
//! - Before an insert, if `len / capacity` exceeds the max load factor
//!   (0.75 by default), the bucket array doubles and every entry is
//!   relinked eagerly. Entries never move in the arena, so growth only
//!   allocates the new bucket array; if that fails the table is unchanged.
//! - No shrink on delete.
//!
//! Constraints and non-goals
//! - Single-threaded; no internal locking. Mutation takes `&mut self`.
//! - No iteration API. `destroy`/`destroy_with` consume the table, so use
//!   after teardown does not compile.
//! - Keys are text only; values are opaque.

#![forbid(unsafe_code)]

pub mod chained_table;
mod chained_table_proptest;
pub mod config;
pub mod error;
pub mod hash;

// Public surface
pub use chained_table::{ChainedTable, InsertError, TableStats};
pub use config::TableConfig;
pub use error::TableError;
pub use hash::{BuildHasherKey, DefaultKeyHasher, KeyHasher};
