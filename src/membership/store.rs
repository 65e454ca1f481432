use parking_lot::RwLock;
use std::collections::HashSet;

use super::types::PeerAddr;

struct Members {
    known: HashSet<PeerAddr>,
    sorted: Vec<PeerAddr>,
    generation: u64,
}

/// Registry of every peer this node has heard of, itself included.
///
/// Knowledge only grows: addresses are added by `merge` and never removed,
/// even when the peer stops answering. The sorted snapshot is rebuilt under
/// the write lock, so readers see either the whole old list or the whole
/// new one.
pub struct MembershipStore {
    local: PeerAddr,
    members: RwLock<Members>,
}

impl MembershipStore {
    pub fn new(local: PeerAddr) -> Self {
        let mut known = HashSet::new();
        known.insert(local.clone());

        Self {
            members: RwLock::new(Members {
                known,
                sorted: vec![local.clone()],
                generation: 0,
            }),
            local,
        }
    }

    pub fn local(&self) -> &PeerAddr {
        &self.local
    }

    /// Copy of the lexicographically sorted membership list.
    pub fn snapshot(&self) -> Vec<PeerAddr> {
        self.members.read().sorted.clone()
    }

    /// Adds every address in `peers`. Returns `true` if at least one was new,
    /// in which case the snapshot has been rebuilt.
    pub fn merge<I>(&self, peers: I) -> bool
    where
        I: IntoIterator<Item = PeerAddr>,
    {
        let mut members = self.members.write();

        let mut added = 0usize;
        for peer in peers {
            if members.known.insert(peer.clone()) {
                tracing::info!("Discovered new member: {}", peer);
                added += 1;
            }
        }

        if added == 0 {
            return false;
        }

        let mut sorted: Vec<PeerAddr> = members.known.iter().cloned().collect();
        sorted.sort();
        members.sorted = sorted;
        members.generation += 1;

        tracing::info!("Cluster size now: {}", members.sorted.len());

        true
    }

    pub fn contains(&self, peer: &PeerAddr) -> bool {
        self.members.read().known.contains(peer)
    }

    pub fn len(&self) -> usize {
        self.members.read().sorted.len()
    }

    /// Number of times the snapshot has been rebuilt since startup.
    pub fn generation(&self) -> u64 {
        self.members.read().generation
    }
}
