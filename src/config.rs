//! Node configuration.

use crate::membership::types::PeerAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SERVER: &str = "localhost";
pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_DB: &str = "db";
/// 16 megabytes.
pub const DEFAULT_CACHE_SIZE: u64 = 1 << 24;
pub const DEFAULT_GOSSIP_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_PEER_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings fixed for the lifetime of a node process.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Host part of this node's address. Together with the bound port it
    /// forms the node's identity, so it must be how peers reach this node.
    pub server: String,

    /// Port to take commands on. `0` binds an ephemeral port.
    pub port: u16,

    /// Storage engine directory.
    pub db_path: PathBuf,

    /// Engine cache capacity in bytes.
    pub cache_size: u64,

    /// Period between gossip rounds.
    pub gossip_interval: Duration,

    /// Bound on each peer dial, write and read. `None` waits forever.
    pub peer_timeout: Option<Duration>,

    /// Peers announced to once at startup.
    pub seeds: Vec<PeerAddr>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            port: DEFAULT_PORT,
            db_path: PathBuf::from(DEFAULT_DB),
            cache_size: DEFAULT_CACHE_SIZE,
            gossip_interval: DEFAULT_GOSSIP_INTERVAL,
            peer_timeout: Some(DEFAULT_PEER_TIMEOUT),
            seeds: Vec::new(),
        }
    }
}

impl NodeConfig {
    /// Create a configuration listening on `server:port`.
    pub fn new(server: impl Into<String>, port: u16) -> Self {
        Self {
            server: server.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = path.into();
        self
    }

    pub fn with_cache_size(mut self, bytes: u64) -> Self {
        self.cache_size = bytes;
        self
    }

    pub fn with_gossip_interval(mut self, interval: Duration) -> Self {
        self.gossip_interval = interval;
        self
    }

    pub fn with_peer_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.peer_timeout = timeout;
        self
    }

    pub fn with_seeds(mut self, seeds: Vec<PeerAddr>) -> Self {
        self.seeds = seeds;
        self
    }

    /// Address to hand to the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server, self.port)
    }
}
