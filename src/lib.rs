//! faculty-connect: semantic faculty search client
//!
//! Submits free-text research interests to a remote semantic-search service
//! and renders the ranked faculty profiles it returns, from a terminal shell
//! or a small web shell.

pub mod config;
pub mod metrics;
pub mod network;
pub mod repl;
pub mod results;
pub mod search;
pub mod view;
pub mod web;

pub use config::Settings;
pub use network::{SearchClient, SearchTransport};
pub use results::{FacultyResult, ResultSet};
pub use search::{SearchController, SearchError, SearchState};
pub use view::ResultRenderer;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
