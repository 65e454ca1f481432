#![allow(dead_code)]

use partition_kv::membership::store::MembershipStore;
use partition_kv::routing::partitioner::{NUM_PARTITIONS, owner_in, partition_of};
use partition_kv::storage::adapter::StorageAdapter;
use partition_kv::storage::engine::{MemoryEngine, StorageEngine};
use partition_kv::{Node, NodeConfig, PeerAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

pub struct TestNode {
    pub addr: PeerAddr,
    pub membership: Arc<MembershipStore>,
    pub storage: Arc<StorageAdapter>,
}

pub fn test_config(seeds: Vec<PeerAddr>) -> NodeConfig {
    NodeConfig::new("127.0.0.1", 0)
        .with_gossip_interval(Duration::from_millis(200))
        .with_peer_timeout(Some(Duration::from_secs(2)))
        .with_seeds(seeds)
}

pub async fn start_node(seeds: Vec<PeerAddr>) -> TestNode {
    start_node_with(test_config(seeds), MemoryEngine::new()).await
}

pub async fn start_node_with<E: StorageEngine + 'static>(config: NodeConfig, engine: E) -> TestNode {
    let node = Node::bind(&config, engine).await.expect("bind test node");
    let membership = node.membership();
    let storage = node.storage();
    let addr = node.spawn();

    TestNode {
        addr,
        membership,
        storage,
    }
}

/// An unused address nobody listens on.
pub fn dead_addr() -> PeerAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    PeerAddr::from(listener.local_addr().unwrap().to_string())
}

/// First `key_N` whose owner under `snapshot` is `owner`.
pub fn key_owned_by(snapshot: &[PeerAddr], owner: &PeerAddr) -> String {
    (0..10_000)
        .map(|i| format!("key_{}", i))
        .find(|k| &owner_in(snapshot, partition_of(k.as_bytes(), NUM_PARTITIONS)) == owner)
        .expect("some key maps to the owner")
}

/// Polls `check` until it holds or `limit` passes.
pub async fn eventually<F: Fn() -> bool>(limit: Duration, check: F) -> bool {
    let deadline = tokio::time::Instant::now() + limit;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    check()
}

pub struct TestClient {
    conn: BufReader<TcpStream>,
}

impl TestClient {
    pub async fn connect(addr: &PeerAddr) -> Self {
        let stream = TcpStream::connect(addr.as_str()).await.unwrap();
        Self {
            conn: BufReader::new(stream),
        }
    }

    /// Sends `line` and returns the reply line, newline included.
    pub async fn send(&mut self, line: &str) -> String {
        self.conn.get_mut().write_all(line.as_bytes()).await.unwrap();

        let mut response = String::new();
        self.conn.read_line(&mut response).await.unwrap();
        response
    }
}
