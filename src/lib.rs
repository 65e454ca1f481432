//! Partitioned Key-Value Store Library
//!
//! A cluster of peer nodes that share 32 hash partitions. Every node speaks
//! the same line protocol over TCP and relays requests for keys it does not
//! own to the peer that does. There is one owner per partition and no
//! replication (n=1, w=1, r=1).
//!
//! ## Architecture Modules
//! - **`storage`**: Local ordered byte store behind a reader-writer lock.
//! - **`membership`**: The set of known peers, its sorted snapshot, and the
//!   gossip loop that keeps nodes' views converging.
//! - **`routing`**: Key to partition to owner mapping and the one-shot peer
//!   exchange used to relay commands.
//! - **`server`**: Line protocol, per-connection command loop and node wiring.
//!
//! ## Known consistency gap
//! Ownership is computed independently on each node from its own snapshot.
//! Until membership converges, two nodes may disagree about who owns a key,
//! and a key's owner moves whenever the cluster grows. Data is not migrated.

pub mod config;
pub mod error;
pub mod membership;
pub mod routing;
pub mod server;
pub mod storage;

pub use config::NodeConfig;
pub use error::{ProtocolError, RelayError, StorageError};
pub use membership::types::PeerAddr;
pub use server::node::Node;
