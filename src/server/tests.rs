//! Server Module Tests
//!
//! ## Test Scopes
//! - **Command dispatch**: local put/get/del/con through `ConnectionHandler::process_line`.
//! - **Error lines**: storage failures, unreachable owners, unrecognized commands.
//! - **Connection loop**: ordering on one socket and termination on malformed lines.
//!
//! *Multi-node relay and gossip scenarios live in `tests/cluster.rs`.*

#[cfg(test)]
mod tests {
    use crate::config::NodeConfig;
    use crate::error::StorageError;
    use crate::membership::store::MembershipStore;
    use crate::membership::types::PeerAddr;
    use crate::routing::client::PeerClient;
    use crate::routing::partitioner::{PartitionManager, owner_in, partition_of};
    use crate::routing::router::Router;
    use crate::server::connection::ConnectionHandler;
    use crate::server::node::Node;
    use crate::storage::adapter::StorageAdapter;
    use crate::storage::engine::{MemoryEngine, StorageEngine};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpStream;

    struct FullDisk;

    impl StorageEngine for FullDisk {
        fn get(&self, _key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
            Ok(None)
        }

        fn put(&mut self, _key: &[u8], _value: &[u8]) -> Result<(), StorageError> {
            Err(StorageError::Engine("IO error: No space left on device".to_string()))
        }

        fn delete(&mut self, _key: &[u8]) -> Result<(), StorageError> {
            Err(StorageError::Engine("IO error: No space left on device".to_string()))
        }
    }

    fn handler_with<E: StorageEngine + 'static>(
        local: &str,
        engine: E,
    ) -> (ConnectionHandler, Arc<MembershipStore>) {
        let membership = Arc::new(MembershipStore::new(PeerAddr::from(local)));
        let partitioner = Arc::new(PartitionManager::new(membership.clone()));
        let router = Arc::new(Router::new(
            partitioner,
            PeerClient::new(Some(Duration::from_secs(2))),
        ));
        let storage = Arc::new(StorageAdapter::new(engine));

        (
            ConnectionHandler::new(router, storage, membership.clone()),
            membership,
        )
    }

    async fn ask(handler: &ConnectionHandler, line: &str) -> String {
        let response = handler
            .process_line(line.as_bytes())
            .await
            .expect("connection should stay open");
        String::from_utf8(response).unwrap()
    }

    // ============================================================
    // LOCAL DISPATCH TESTS
    // ============================================================

    #[tokio::test]
    async fn test_single_node_put_get_del_scenario() {
        let (handler, _) = handler_with("localhost:4000", MemoryEngine::new());

        assert_eq!(ask(&handler, "put thiskey thisval\n").await, "success\n");
        assert_eq!(ask(&handler, "get thiskey\n").await, "thisval\n");
        assert_eq!(ask(&handler, "del thiskey\n").await, "success\n");
        assert_eq!(ask(&handler, "get thiskey\n").await, "\n");
    }

    #[tokio::test]
    async fn test_repeated_delete_succeeds() {
        let (handler, _) = handler_with("localhost:4000", MemoryEngine::new());

        ask(&handler, "put k v\n").await;
        assert_eq!(ask(&handler, "del k\n").await, "success\n");
        assert_eq!(ask(&handler, "del k\n").await, "success\n");
        assert_eq!(ask(&handler, "get k\n").await, "\n");
    }

    #[tokio::test]
    async fn test_con_registers_sender_and_lists_members() {
        let (handler, membership) = handler_with("localhost:4000", MemoryEngine::new());

        let response = ask(&handler, "con localhost:9999\n").await;

        assert_eq!(response, "localhost:4000 localhost:9999 \n");
        assert!(membership.contains(&PeerAddr::from("localhost:9999")));

        // Already known: same list, no rebuild.
        assert_eq!(ask(&handler, "con localhost:9999\n").await, response);
        assert_eq!(membership.generation(), 1);
    }

    #[tokio::test]
    async fn test_unrecognized_keeps_connection_open() {
        let (handler, _) = handler_with("localhost:4000", MemoryEngine::new());

        assert_eq!(ask(&handler, "xyz foo\n").await, "unrecognized\n");
        assert_eq!(ask(&handler, "put a b\n").await, "success\n");
    }

    #[tokio::test]
    async fn test_malformed_line_stops_the_loop() {
        let (handler, _) = handler_with("localhost:4000", MemoryEngine::new());

        assert!(handler.process_line(b"ab\n").await.is_none());
        assert!(handler.process_line(b"get \n").await.is_none());
        assert!(handler.process_line(b"get k").await.is_none());
    }

    #[tokio::test]
    async fn test_storage_failure_is_reported() {
        let (handler, _) = handler_with("localhost:4000", FullDisk);

        assert_eq!(
            ask(&handler, "put k v\n").await,
            "database error: IO error: No space left on device\n"
        );
        assert_eq!(
            ask(&handler, "del k\n").await,
            "database error: IO error: No space left on device\n"
        );
        assert_eq!(ask(&handler, "get k\n").await, "\n");
    }

    // ============================================================
    // RELAY FAILURE TESTS
    // ============================================================

    #[tokio::test]
    async fn test_unreachable_owner_gives_relay_error_line() {
        let dead = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            PeerAddr::from(listener.local_addr().unwrap().to_string())
        };

        let (handler, membership) = handler_with("localhost:4000", MemoryEngine::new());
        membership.merge([dead.clone()]);
        let snapshot = membership.snapshot();

        let key = (0..1000)
            .map(|i| format!("key_{}", i))
            .find(|k| owner_in(&snapshot, partition_of(k.as_bytes(), 32)) == dead)
            .expect("some key maps to the dead peer");

        let response = ask(&handler, &format!("get {}\n", key)).await;
        assert!(response.starts_with("relay error: "), "got {:?}", response);
        assert!(response.ends_with('\n'));

        // No local fallback, and the dead owner stays a member.
        let response = ask(&handler, &format!("put {} v\n", key)).await;
        assert!(response.starts_with("relay error: "), "got {:?}", response);
        assert!(membership.contains(&dead));
    }

    // ============================================================
    // CONNECTION LOOP TESTS
    // ============================================================

    #[tokio::test]
    async fn test_connection_loop_over_tcp() {
        let config = NodeConfig::new("127.0.0.1", 0).with_peer_timeout(Some(Duration::from_secs(2)));
        let node = Node::bind(&config, MemoryEngine::new()).await.unwrap();
        let addr = node.spawn();

        let stream = TcpStream::connect(addr.as_str()).await.unwrap();
        let mut reader = BufReader::new(stream);

        // Pipelined writes are still answered one by one, in order.
        reader
            .get_mut()
            .write_all(b"put a 1\nput b 2\nget a\nget b\nxyz\n")
            .await
            .unwrap();

        let mut responses = Vec::new();
        for _ in 0..5 {
            let mut line = String::new();
            reader.read_line(&mut line).await.unwrap();
            responses.push(line);
        }
        assert_eq!(
            responses,
            vec!["success\n", "success\n", "1\n", "2\n", "unrecognized\n"]
        );

        // A malformed line ends the session.
        reader.get_mut().write_all(b"ab\n").await.unwrap();
        let mut line = String::new();
        assert_eq!(reader.read_line(&mut line).await.unwrap(), 0);
    }
}
