//! Error types shared by the node's subsystems.
//!
//! Every variant here is handled inside the connection, relay or gossip task
//! that produced it. Only startup failures (binding the listener, opening the
//! storage engine) are allowed to reach `main`.

use std::io;
use thiserror::Error;

/// Failures reported by the storage engine.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backing engine rejected an operation. The message is sent to the
    /// client verbatim.
    #[error("{0}")]
    Engine(String),

    /// The engine could not be opened at startup.
    #[error("failed to open storage at {path}: {message}")]
    Open { path: String, message: String },
}

impl From<sled::Error> for StorageError {
    fn from(e: sled::Error) -> Self {
        StorageError::Engine(e.to_string())
    }
}

/// Failures talking to a peer during relay or gossip. Never retried.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("couldn't dial {peer}: {source}")]
    Connect {
        peer: String,
        #[source]
        source: io::Error,
    },

    #[error("i/o error with {peer}: {source}")]
    Io {
        peer: String,
        #[source]
        source: io::Error,
    },

    /// The peer closed the connection before sending a full line.
    #[error("{peer} closed the connection without a response")]
    Closed { peer: String },

    #[error("timed out waiting for {peer}")]
    Timeout { peer: String },
}

/// A protocol line that could not be turned into a command.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProtocolError {
    /// The command word is not one of `get`, `put`, `del`, `con`.
    #[error("unrecognized command")]
    Unrecognized,

    /// The line cannot be processed at all; the connection loop stops.
    #[error("malformed line: {0}")]
    Malformed(&'static str),
}
