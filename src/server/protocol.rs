//! Line Protocol
//!
//! Newline-terminated ASCII lines, one request and one response at a time.
//!
//! | Request               | Response                        |
//! |-----------------------|---------------------------------|
//! | `put <key> <value>\n` | `success\n`                     |
//! | `get <key>\n`         | `<value>\n` (empty if absent)   |
//! | `del <key>\n`         | `success\n`                     |
//! | `con <address>\n`     | `<addr1> <addr2> ... \n`        |
//! | anything else         | `unrecognized\n`                |
//!
//! Storage failures answer `database error: <message>\n`. Keys cannot contain
//! spaces and values cannot contain newlines; there is no escaping.

use crate::error::ProtocolError;
use crate::membership::types::PeerAddr;

const SPACE: u8 = b' ';
const NEXT: u8 = b'\n';

pub const SUCCESS: &[u8] = b"success\n";
pub const UNRECOGNIZED: &[u8] = b"unrecognized\n";

/// A parsed request line. Keys and values borrow from the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Get { key: &'a [u8] },
    Put { key: &'a [u8], value: &'a [u8] },
    Del { key: &'a [u8] },
    Con { addr: PeerAddr },
}

impl<'a> Command<'a> {
    /// Parses one line, including its trailing `\n`.
    pub fn parse(line: &'a [u8]) -> Result<Self, ProtocolError> {
        if line.len() < 4 {
            return Err(ProtocolError::Malformed("line shorter than a command word"));
        }

        let body = line
            .strip_suffix(&[NEXT])
            .ok_or(ProtocolError::Malformed("line not newline terminated"))?;

        // A four byte word that swallowed the newline is never a command.
        if body.len() < 4 {
            return Err(ProtocolError::Unrecognized);
        }

        let (word, rest) = body.split_at(4);

        match word {
            b"get " => Ok(Command::Get {
                key: routing_key(rest)?,
            }),
            b"del " => Ok(Command::Del {
                key: routing_key(rest)?,
            }),
            b"put " => {
                let split = rest
                    .iter()
                    .position(|&b| b == SPACE)
                    .ok_or(ProtocolError::Malformed("put without a value"))?;
                let key = &rest[..split];
                if key.is_empty() {
                    return Err(ProtocolError::Malformed("missing key"));
                }
                Ok(Command::Put {
                    key,
                    value: &rest[split + 1..],
                })
            }
            b"con " => {
                let addr = String::from_utf8_lossy(rest).trim().to_string();
                if addr.is_empty() {
                    return Err(ProtocolError::Malformed("missing address"));
                }
                Ok(Command::Con {
                    addr: PeerAddr::from(addr),
                })
            }
            _ => Err(ProtocolError::Unrecognized),
        }
    }

    /// Key used to pick the owning partition, if the command has one.
    pub fn key(&self) -> Option<&'a [u8]> {
        match self {
            Command::Get { key } | Command::Put { key, .. } | Command::Del { key } => Some(*key),
            Command::Con { .. } => None,
        }
    }
}

/// Key after the command word: up to the first space, or the whole rest.
fn routing_key(rest: &[u8]) -> Result<&[u8], ProtocolError> {
    let key = match rest.iter().position(|&b| b == SPACE) {
        Some(end) => &rest[..end],
        None => rest,
    };

    if key.is_empty() {
        return Err(ProtocolError::Malformed("missing key"));
    }
    Ok(key)
}

pub fn value_response(value: &[u8]) -> Vec<u8> {
    let mut response = Vec::with_capacity(value.len() + 1);
    response.extend_from_slice(value);
    response.push(NEXT);
    response
}

pub fn database_error(message: &str) -> Vec<u8> {
    format!("database error: {}\n", message).into_bytes()
}

pub fn relay_error(message: &str) -> Vec<u8> {
    format!("relay error: {}\n", message).into_bytes()
}
