use crate::membership::{store::MembershipStore, types::PeerAddr};
use sha1::{Digest, Sha1};
use std::sync::Arc;

pub const NUM_PARTITIONS: u32 = 32;

/// Maps keys to partitions and partitions to owning peers.
///
/// Ownership is recomputed from the live membership snapshot on every call.
/// Two nodes with different snapshots can disagree on the owner, and a key's
/// owner moves whenever the cluster size changes; no data follows it.
pub struct PartitionManager {
    num_partitions: u32,
    membership: Arc<MembershipStore>,
}

impl PartitionManager {
    pub fn new(membership: Arc<MembershipStore>) -> Self {
        Self {
            num_partitions: NUM_PARTITIONS,
            membership,
        }
    }

    pub fn membership(&self) -> &Arc<MembershipStore> {
        &self.membership
    }

    pub fn num_partitions(&self) -> u32 {
        self.num_partitions
    }

    /// First byte of the SHA-1 digest of the key, modulo the partition count.
    pub fn get_partition(&self, key: &[u8]) -> u32 {
        partition_of(key, self.num_partitions)
    }

    pub fn get_owner(&self, partition: u32) -> PeerAddr {
        owner_in(&self.membership.snapshot(), partition)
    }

    pub fn owner_of(&self, key: &[u8]) -> PeerAddr {
        self.get_owner(self.get_partition(key))
    }

    pub fn is_local(&self, owner: &PeerAddr) -> bool {
        owner == self.membership.local()
    }

    /// Partitions this node owns under the current snapshot.
    pub fn my_partitions(&self) -> Vec<u32> {
        let snapshot = self.membership.snapshot();
        let me = self.membership.local();

        (0..self.num_partitions)
            .filter(|&partition| &owner_in(&snapshot, partition) == me)
            .collect()
    }

    /// Logs how many partitions this node owns right now and returns the count.
    pub fn log_ownership(&self) -> usize {
        let owned = self.my_partitions().len();
        tracing::info!("Owning {} of {} partitions", owned, self.num_partitions);
        owned
    }
}

pub fn partition_of(key: &[u8], num_partitions: u32) -> u32 {
    let digest = Sha1::digest(key);
    u32::from(digest[0]) % num_partitions
}

/// `snapshot` is never empty: the local node is always a member.
pub fn owner_in(snapshot: &[PeerAddr], partition: u32) -> PeerAddr {
    let idx = (partition as usize) % snapshot.len();
    snapshot[idx].clone()
}
