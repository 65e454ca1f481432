//! Membership & Discovery Module
//!
//! Tracks which peers make up the cluster. A peer is known by its `host:port`
//! address alone.
//!
//! ## Core Mechanisms
//! - **Monotonic membership**: `MembershipStore` only ever adds addresses. There is
//!   no failure detection and no eviction.
//! - **Deterministic snapshot**: the member list is kept sorted so that nodes
//!   which know the same peers compute the same partition owners.
//! - **Gossip**: `GossipScheduler` sends `con <self>` to every known peer on a fixed
//!   interval and merges the lists they return, so late joiners converge.

pub mod gossip;
pub mod store;
pub mod types;
