//! Wire types exchanged with the semantic-search service

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// A successfully parsed response body.
///
/// Only the shape of the top level is trusted: `results` is kept as raw JSON
/// so that a missing or non-array field degrades to an empty result set
/// instead of failing the whole response.
#[derive(Debug, Clone, Default)]
pub struct SearchResponse {
    pub results: Option<Value>,
    /// Advisory text the service attaches to degraded answers ("AI Timeout")
    pub message: Option<String>,
}

impl SearchResponse {
    /// Parse a response body. Any valid JSON is accepted; non-object JSON
    /// yields a response without results.
    pub fn from_body(body: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(body)?;
        Ok(Self::from_value(value))
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut map) => Self {
                results: map.remove("results"),
                message: map
                    .remove("message")
                    .and_then(|m| m.as_str().map(str::to_string)),
            },
            _ => Self::default(),
        }
    }

    /// The raw records, if `results` is an array
    pub fn records(&self) -> Option<&[Value]> {
        self.results
            .as_ref()
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }
}

/// One faculty record as the service sends it. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawFacultyRecord {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub score: Option<f64>,
    pub image_url: Option<String>,
    pub profile_url: Option<String>,
    pub teaching: Option<String>,
    pub publications: Option<String>,
}

/// Answer to the health probe (`GET /`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceStatus {
    /// HTTP status of the probe
    pub status: u16,
    /// Message the service reports when awake
    pub message: Option<String>,
}

impl ServiceStatus {
    pub fn is_online(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(SearchRequest::new("machine learning")).unwrap();
        assert_eq!(body, json!({ "query": "machine learning" }));
    }

    #[test]
    fn test_response_with_results() {
        let response =
            SearchResponse::from_body(r#"{"results": [{"name": "A"}, {"name": "B"}]}"#).unwrap();
        assert_eq!(response.records().map(<[Value]>::len), Some(2));
        assert!(response.message.is_none());
    }

    #[test]
    fn test_response_without_array() {
        for body in [
            r#"{}"#,
            r#"{"results": null}"#,
            r#"{"results": "nope"}"#,
            r#"{"results": {"name": "A"}}"#,
            r#"[1, 2, 3]"#,
            r#""text""#,
        ] {
            let response = SearchResponse::from_body(body).unwrap();
            assert!(response.records().is_none(), "body: {}", body);
        }
    }

    #[test]
    fn test_response_message() {
        let response =
            SearchResponse::from_body(r#"{"results": [], "message": "AI Timeout"}"#).unwrap();
        assert_eq!(response.message.as_deref(), Some("AI Timeout"));
        assert_eq!(response.records().map(<[Value]>::len), Some(0));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(SearchResponse::from_body("<html>502 Bad Gateway</html>").is_err());
    }
}
