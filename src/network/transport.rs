//! The seam between the controller and the remote service

use crate::search::{SearchError, SearchRequest, SearchResponse, ServiceStatus};
use async_trait::async_trait;

/// Anything able to answer a search request.
///
/// [`super::SearchClient`] talks HTTP; tests substitute scripted transports.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Send one search request and parse the body.
    ///
    /// Implementations must return `Err` for transport failures, non-2xx
    /// statuses and bodies that are not JSON. A JSON body without a usable
    /// `results` array is still `Ok`.
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError>;

    /// Probe whether the service is awake
    async fn health(&self) -> Result<ServiceStatus, SearchError> {
        Err(SearchError::Transport(
            "health probe not supported by this transport".to_string(),
        ))
    }
}
