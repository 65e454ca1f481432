use std::sync::Arc;

use super::client::PeerClient;
use super::partitioner::PartitionManager;
use crate::error::RelayError;
use crate::membership::types::PeerAddr;

/// Where a keyed command has to be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Local,
    Remote(PeerAddr),
}

/// Decides ownership for keyed commands and forwards the ones owned by other
/// peers.
pub struct Router {
    partitioner: Arc<PartitionManager>,
    client: PeerClient,
}

impl Router {
    pub fn new(partitioner: Arc<PartitionManager>, client: PeerClient) -> Self {
        Self {
            partitioner,
            client,
        }
    }

    pub fn partitioner(&self) -> &Arc<PartitionManager> {
        &self.partitioner
    }

    pub fn route(&self, key: &[u8]) -> Route {
        let partition = self.partitioner.get_partition(key);
        let owner = self.partitioner.get_owner(partition);

        tracing::debug!(
            "Key {} -> partition {} -> {}",
            String::from_utf8_lossy(key),
            partition,
            owner
        );

        if self.partitioner.is_local(&owner) {
            Route::Local
        } else {
            Route::Remote(owner)
        }
    }

    /// Forwards the raw command line unmodified and returns the owner's
    /// single response line. Not retried, and no local fallback.
    pub async fn relay(&self, owner: &PeerAddr, line: &[u8]) -> Result<Vec<u8>, RelayError> {
        self.client.exchange(owner, line).await
    }
}
