//! Local Storage Module
//!
//! Holds the key/value pairs for the partitions this node owns.
//!
//! ## Core Concepts
//! - **Engine**: `StorageEngine` is the ordered byte store underneath. `SledEngine`
//!   is the durable one; `MemoryEngine` keeps everything in a `BTreeMap`.
//! - **Adapter**: `StorageAdapter` wraps the engine in a reader-writer lock so
//!   any number of connection tasks can use it at once.
//!
//! There is no versioning and no replication: one owner, one write, one read.

pub mod adapter;
pub mod engine;
