//! One-shot peer exchange.
//!
//! Relay and gossip both talk to peers the same way: dial, write one line,
//! read one line, close. The calling task is blocked for the whole exchange.

use std::future::Future;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::error::RelayError;
use crate::membership::types::PeerAddr;

#[derive(Debug, Clone, Default)]
pub struct PeerClient {
    timeout: Option<Duration>,
}

impl PeerClient {
    /// `timeout` bounds each of the dial, write and read steps separately.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Sends `line` (which must already end in `\n`) to `peer` and returns the
    /// single response line, newline included.
    pub async fn exchange(&self, peer: &PeerAddr, line: &[u8]) -> Result<Vec<u8>, RelayError> {
        let stream = self
            .bounded(peer, TcpStream::connect(peer.as_str()))
            .await?
            .map_err(|source| RelayError::Connect {
                peer: peer.to_string(),
                source,
            })?;

        let mut reader = BufReader::new(stream);

        self.bounded(peer, reader.get_mut().write_all(line))
            .await?
            .map_err(|source| RelayError::Io {
                peer: peer.to_string(),
                source,
            })?;

        let mut response = Vec::new();
        let read = self
            .bounded(peer, reader.read_until(b'\n', &mut response))
            .await?
            .map_err(|source| RelayError::Io {
                peer: peer.to_string(),
                source,
            })?;

        if read == 0 || response.last() != Some(&b'\n') {
            return Err(RelayError::Closed {
                peer: peer.to_string(),
            });
        }

        Ok(response)
    }

    async fn bounded<F, T>(&self, peer: &PeerAddr, fut: F) -> Result<T, RelayError>
    where
        F: Future<Output = T>,
    {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| RelayError::Timeout {
                    peer: peer.to_string(),
                }),
            None => Ok(fut.await),
        }
    }
}
