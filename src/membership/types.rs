use std::fmt;

/// A node's `host:port` address. It is the node's only identity.
///
/// Ordering is plain lexicographic ordering of the string, which is what
/// makes the sorted membership snapshot identical on every node that knows
/// the same set of peers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerAddr(pub String);

impl PeerAddr {
    pub fn new(host: &str, port: u16) -> Self {
        Self(format!("{}:{}", host, port))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerAddr {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PeerAddr {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Encodes a membership list the way `con` answers it: every address
/// followed by a space, then the newline.
pub fn format_peer_list(peers: &[PeerAddr]) -> String {
    let mut line = String::new();
    for peer in peers {
        line.push_str(peer.as_str());
        line.push(' ');
    }
    line.push('\n');
    line
}

/// Parses a whitespace separated membership list. Empty tokens are dropped.
pub fn parse_peer_list(line: &str) -> Vec<PeerAddr> {
    line.split_whitespace().map(PeerAddr::from).collect()
}
