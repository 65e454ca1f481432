use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use super::protocol::{
    Command, SUCCESS, UNRECOGNIZED, database_error, relay_error, value_response,
};
use crate::error::ProtocolError;
use crate::membership::store::MembershipStore;
use crate::membership::types::format_peer_list;
use crate::routing::router::{Route, Router};
use crate::storage::adapter::StorageAdapter;

/// Serves the command loop of client connections.
///
/// Commands on one connection are handled strictly in order. A relay blocks
/// the connection it was issued on until the owner answers.
pub struct ConnectionHandler {
    router: Arc<Router>,
    storage: Arc<StorageAdapter>,
    membership: Arc<MembershipStore>,
}

impl ConnectionHandler {
    pub fn new(
        router: Arc<Router>,
        storage: Arc<StorageAdapter>,
        membership: Arc<MembershipStore>,
    ) -> Self {
        Self {
            router,
            storage,
            membership,
        }
    }

    /// Reads lines until the client disconnects, a read fails, or a line is
    /// malformed.
    pub async fn handle_connection(&self, stream: TcpStream, peer: SocketAddr) -> io::Result<()> {
        let mut reader = BufReader::new(stream);
        let mut line = Vec::new();

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line).await? == 0 {
                break;
            }

            tracing::debug!(
                "recv on {} from {}: {}",
                self.membership.local(),
                peer,
                String::from_utf8_lossy(&line).trim_end()
            );

            let Some(response) = self.process_line(&line).await else {
                break;
            };

            reader.get_mut().write_all(&response).await?;
            tracing::debug!("send: {}", String::from_utf8_lossy(&response).trim_end());
        }

        tracing::debug!("End connection from {}", peer);
        Ok(())
    }

    /// Produces the response for one line, or `None` when the connection
    /// should stop reading.
    pub async fn process_line(&self, line: &[u8]) -> Option<Vec<u8>> {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(ProtocolError::Unrecognized) => {
                tracing::info!("recv: unrecognized command");
                return Some(UNRECOGNIZED.to_vec());
            }
            Err(e) => {
                tracing::debug!("Closing connection: {}", e);
                return None;
            }
        };

        if let Some(key) = command.key()
            && let Route::Remote(owner) = self.router.route(key)
        {
            let response = match self.router.relay(&owner, line).await {
                Ok(response) => {
                    tracing::debug!(
                        "relay from {}: {}",
                        owner,
                        String::from_utf8_lossy(&response).trim_end()
                    );
                    response
                }
                Err(e) => {
                    tracing::warn!("relay error: {}", e);
                    relay_error(&e.to_string())
                }
            };
            return Some(response);
        }

        Some(self.execute(command))
    }

    /// Runs a command this node is responsible for.
    fn execute(&self, command: Command<'_>) -> Vec<u8> {
        match command {
            Command::Put { key, value } => match self.storage.put(key, value) {
                Ok(()) => SUCCESS.to_vec(),
                Err(e) => database_error(&e.to_string()),
            },
            Command::Get { key } => match self.storage.get(key) {
                Ok(value) => value_response(&value),
                Err(e) => database_error(&e.to_string()),
            },
            Command::Del { key } => match self.storage.delete(key) {
                Ok(()) => SUCCESS.to_vec(),
                Err(e) => database_error(&e.to_string()),
            },
            Command::Con { addr } => {
                tracing::info!("recv: connect {}", addr);

                if self.membership.merge([addr]) {
                    self.router.partitioner().log_ownership();
                }
                format_peer_list(&self.membership.snapshot()).into_bytes()
            }
        }
    }
}
