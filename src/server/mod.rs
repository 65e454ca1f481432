//! Node Server
//!
//! Accepts TCP connections and runs one task per connection. Each task reads
//! protocol lines, serves keys this node owns from local storage, relays the
//! rest to their owner and answers `con` with the membership list.
//!
//! Connection count is unbounded; a client only ever affects its own task.

pub mod connection;
pub mod node;
pub mod protocol;

#[cfg(test)]
mod tests;
