//! chain-table: a single-threaded, fixed-capacity hash table with separate
//! chaining, built to record content checksums seen during a directory walk.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small dictionary whose ownership is explicit in the types and
//!   whose behavior under collisions is easy to reason about.
//! - Layers:
//!   - `hash`: FNV hashing of raw key bytes, exposed both as a pure
//!     function and as a `BuildHasher` so the table can be generic over it.
//!   - `record`: one key/value entry plus the `next` link of its chain;
//!     records live in a `SlotMap` arena and chains are sequences of
//!     arena keys.
//!   - `table`: the bucket array of chain heads, upsert/search/remove and
//!     ordered output.
//!   - `scan` (feature `scan`): walks files, digests their contents, and
//!     uses a table to report duplicates.
//!
//! Constraints
//! - Single-threaded: `!Send`/`!Sync` through the reentrancy tracker.
//! - Capacity is fixed at creation; there is no rehashing. Chains absorb
//!   any number of collisions.
//! - Keys are unique; inserting an existing key updates its value.
//! - Allocation failure while creating a table or copying a key is
//!   returned as [`AllocError`] and leaves the table unchanged.
//!
//! Ownership
//! - The table owns its arena; the arena owns every record; a record owns
//!   its key and its [`Value`]. Chain links are arena keys, not pointers,
//!   so releasing a long chain is a loop rather than a recursion.
//! - Consuming [`Table::destroy`] (or dropping the table) ends its life;
//!   no operation is reachable on a destroyed table.
//!
//! Reentrancy policy
//! - The only user code a table runs is its `BuildHasher`. Each public
//!   method opens a debug-only section; a hasher that calls back into the
//!   same table panics in debug builds instead of observing a half-linked
//!   chain.

mod error;
pub mod hash;
mod record;
mod reentrancy;
#[cfg(feature = "scan")]
pub mod scan;
pub mod table;
mod table_proptest;
mod value;

// Public surface
pub use error::{AllocError, Result};
pub use hash::{hash_from_data, BuildFnv, FnvHasher};
pub use table::{Table, DEFAULT_CAPACITY};
pub use value::Value;
