//! HTTP networking module
//!
//! Provides the client used to reach the semantic-search service.

mod client;
mod transport;

pub use client::SearchClient;
pub use transport::SearchTransport;
