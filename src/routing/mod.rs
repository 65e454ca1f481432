//! Partition Routing
//!
//! Keys are hashed into 32 fixed partitions. A partition's owner is the peer
//! at position `partition mod len` of the sorted membership snapshot.
//!
//! ## Core Concepts
//! - **Partitioning**: `PartitionManager` computes partition indexes and owners.
//! - **Relay**: `Router` forwards commands for keys owned elsewhere through a
//!   one-shot `PeerClient` exchange and hands back the owner's reply.

pub mod client;
pub mod partitioner;
pub mod router;
