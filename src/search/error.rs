//! Search error taxonomy

use thiserror::Error;

/// Ways a submission can fail to produce results
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Blank query; submission is ignored without touching state
    #[error("query is empty")]
    EmptyQuery,
    /// Network unreachable, DNS failure, refused connection or timeout
    #[error("search service unreachable: {0}")]
    Transport(String),
    /// The service answered with a non-2xx status
    #[error("search service returned HTTP {0}")]
    Status(u16),
    /// The response body is not JSON
    #[error("search service sent a malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => SearchError::Status(status.as_u16()),
            None if e.is_decode() => SearchError::MalformedResponse(e.to_string()),
            None => SearchError::Transport(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(e: serde_json::Error) -> Self {
        SearchError::MalformedResponse(e.to_string())
    }
}
