//! symtable: a single-threaded symbol table mapping owned string keys to
//! caller-supplied values.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a string-keyed map whose growth policy, hash and collision
//!   handling are fixed and inspectable rather than delegated.
//! - Backends:
//!   - HashSymTable<V>: bucket array of collision chains. Grows through a
//!     fixed ascending sequence of bucket counts (`GrowthSizes`, primes by
//!     default) whenever the number of bindings exceeds the number of
//!     buckets.
//!   - ListSymTable<V>: a single chain. O(n) everywhere; the reference
//!     backend.
//!   - Both implement `SymbolTable<V>`, so callers can be generic over the
//!     backend.
//!
//! Constraints
//! - Single-threaded: no internal locking. Every mutation takes `&mut self`.
//! - Keys are unique; inserting a present key fails and never overwrites.
//! - Keys are copied into table-owned `Box<str>`s; values are stored and
//!   handed back verbatim, never inspected.
//! - The hash table never shrinks and never rehashes on removal.
//!
//! Storage
//! - Bindings live in a per-table `slotmap` arena. Chains are linked by
//!   arena keys, so a rehash rewrites links and never moves a key or value.
//! - Buckets are `Option<BindingKey>` chain heads; new bindings are
//!   prepended, so a chain reads newest first.
//!
//! Hashing and growth
//! - `hash_key` folds bytes as `h = h * 65599 + byte` with wrapping `usize`
//!   arithmetic and reduces modulo the current bucket count.
//! - After each successful insert: if the table is not at its last tier
//!   and `len > bucket_count`, allocate the next tier's bucket array,
//!   relink every binding by its hash against the new count and swap the
//!   array in.
//!
//! Failure semantics
//! - Key copies and bucket arrays are allocated with `try_reserve_exact`.
//!   A failed key copy fails the insert with the table unchanged. A failed
//!   growth allocation is logged and skipped; the next insert retries.
//! - Duplicate keys and missing keys are ordinary outcomes
//!   (`InsertError::DuplicateKey`, `None`).
//!
//! Notes and non-goals
//! - No key ordering and no stable iteration order across growth.
//! - No structural mutation during traversal (ruled out by borrowing).
//! - No persistence.

mod alloc;
mod chain;
pub mod error;
pub mod growth;
pub mod hash;
pub mod hash_sym_table;
pub mod list_sym_table;
mod sym_table_proptest;
pub mod symbol_table;

// Public surface
pub use error::{AllocError, GrowthConfigError, InsertError};
pub use growth::{GrowthSizes, DEFAULT_GROWTH_SIZES};
pub use hash::hash_key;
pub use hash_sym_table::HashSymTable;
pub use list_sym_table::ListSymTable;
pub use symbol_table::SymbolTable;
