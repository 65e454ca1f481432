use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};

use super::store::MembershipStore;
use super::types::{PeerAddr, parse_peer_list};
use crate::error::RelayError;
use crate::routing::client::PeerClient;
use crate::routing::partitioner::PartitionManager;

/// Periodically re-announces this node to every known peer and merges the
/// membership lists they send back.
///
/// Unreachable peers are logged and skipped. They stay in the membership
/// list and are tried again on the next round.
pub struct GossipScheduler {
    membership: Arc<MembershipStore>,
    partitioner: Arc<PartitionManager>,
    client: PeerClient,
    interval: Duration,
}

impl GossipScheduler {
    pub fn new(partitioner: Arc<PartitionManager>, client: PeerClient, interval: Duration) -> Self {
        Self {
            membership: partitioner.membership().clone(),
            partitioner,
            client,
            interval,
        }
    }

    /// Spawns the gossip loop. It runs for the lifetime of the process.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tracing::info!("Starting gossip every {:?}", self.interval);

        tokio::spawn(async move {
            self.gossip_loop().await;
        })
    }

    async fn gossip_loop(&self) {
        let mut interval =
            tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            self.run_round().await;
        }
    }

    /// One gossip round over the current snapshot. Returns the number of
    /// peers that answered.
    pub async fn run_round(&self) -> usize {
        let peers = self.membership.snapshot();

        tracing::info!(
            "Server list: {}",
            peers
                .iter()
                .map(PeerAddr::as_str)
                .collect::<Vec<_>>()
                .join(" ")
        );

        let mut answered = 0;
        for peer in peers.iter().filter(|p| *p != self.membership.local()) {
            match self.announce(peer).await {
                Ok(_) => answered += 1,
                Err(e) => tracing::warn!("Gossip with {} failed: {}", peer, e),
            }
        }

        answered
    }

    /// Sends `con <self>` to `peer` and merges its reply. Returns whether the
    /// reply taught us any new address.
    pub async fn announce(&self, peer: &PeerAddr) -> Result<bool, RelayError> {
        let line = format!("con {}\n", self.membership.local());
        let response = self.client.exchange(peer, line.as_bytes()).await?;

        let peers = parse_peer_list(&String::from_utf8_lossy(&response));
        tracing::debug!("{} knows {} peers", peer, peers.len());

        let grew = self.membership.merge(peers);
        if grew {
            self.partitioner.log_ownership();
        }

        Ok(grew)
    }

    /// Announces to each seed once. Used at startup so a fresh node joins
    /// without waiting for someone to send it `con`.
    pub async fn join(&self, seeds: &[PeerAddr]) {
        for seed in seeds.iter().filter(|s| *s != self.membership.local()) {
            tracing::info!("Joining cluster via {}", seed);

            if let Err(e) = self.announce(seed).await {
                tracing::warn!("Seed {} unreachable: {}", seed, e);
            }
        }
    }
}
