use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::ConnectionHandler;
use crate::config::NodeConfig;
use crate::membership::gossip::GossipScheduler;
use crate::membership::store::MembershipStore;
use crate::membership::types::PeerAddr;
use crate::routing::client::PeerClient;
use crate::routing::partitioner::PartitionManager;
use crate::routing::router::Router;
use crate::storage::adapter::StorageAdapter;
use crate::storage::engine::StorageEngine;

/// A bound, fully wired node that has not started serving yet.
pub struct Node {
    listener: TcpListener,
    membership: Arc<MembershipStore>,
    storage: Arc<StorageAdapter>,
    router: Arc<Router>,
    gossip: Arc<GossipScheduler>,
    seeds: Vec<PeerAddr>,
}

impl Node {
    /// Binds the listening socket and builds the services around `engine`.
    ///
    /// The node's address is `config.server` plus the port actually bound,
    /// so port `0` works for ephemeral nodes.
    pub async fn bind<E: StorageEngine + 'static>(config: &NodeConfig, engine: E) -> io::Result<Self> {
        let listener = TcpListener::bind(config.bind_addr()).await?;
        let local = PeerAddr::new(&config.server, listener.local_addr()?.port());

        let membership = Arc::new(MembershipStore::new(local));
        let storage = Arc::new(StorageAdapter::new(engine));
        let client = PeerClient::new(config.peer_timeout);

        let partitioner = Arc::new(PartitionManager::new(membership.clone()));
        let router = Arc::new(Router::new(partitioner.clone(), client.clone()));
        let gossip = Arc::new(GossipScheduler::new(
            partitioner,
            client,
            config.gossip_interval,
        ));

        Ok(Self {
            listener,
            membership,
            storage,
            router,
            gossip,
            seeds: config.seeds.clone(),
        })
    }

    pub fn local_addr(&self) -> &PeerAddr {
        self.membership.local()
    }

    pub fn membership(&self) -> Arc<MembershipStore> {
        self.membership.clone()
    }

    pub fn storage(&self) -> Arc<StorageAdapter> {
        self.storage.clone()
    }

    /// Serves connections forever. Joining via the seeds and the gossip
    /// loop run on their own task so the node answers `con` while it is
    /// still waiting on a seed.
    pub async fn run(self) {
        tracing::info!("Run on {}", self.membership.local());
        self.router.partitioner().log_ownership();

        let handler = Arc::new(ConnectionHandler::new(
            self.router.clone(),
            self.storage.clone(),
            self.membership.clone(),
        ));

        let gossip = self.gossip.clone();
        let seeds = self.seeds.clone();
        tokio::spawn(async move {
            gossip.join(&seeds).await;
            let _gossip_handle = gossip.start();
        });

        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    tracing::debug!("Accepted connection from {}", peer);
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handler.handle_connection(stream, peer).await {
                            tracing::debug!("Connection from {} failed: {}", peer, e);
                        }
                    });
                }
                Err(e) => {
                    tracing::error!("Couldn't accept: {}", e);
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            }
        }
    }

    /// Runs the node on a background task and returns its address.
    pub fn spawn(self) -> PeerAddr {
        let local = self.local_addr().clone();
        tokio::spawn(self.run());
        local
    }
}
