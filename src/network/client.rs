//! HTTP client for the semantic-search service

use super::transport::SearchTransport;
use crate::config::ServiceSettings;
use crate::search::{SearchError, SearchRequest, SearchResponse, ServiceStatus};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::{header, Client};
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client wrapper bound to the configured endpoints
#[derive(Clone)]
pub struct SearchClient {
    client: Client,
    search_url: String,
    health_url: String,
    timeout: Option<Duration>,
}

impl SearchClient {
    /// Create a client for the configured endpoints
    pub fn with_settings(settings: &ServiceSettings) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));

        // No timeout unless configured; the transport default applies
        if let Some(timeout) = settings.timeout() {
            builder = builder.timeout(timeout);
        }

        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ref proxy_url) = settings.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        Ok(Self {
            client: builder.build()?,
            search_url: settings.search_url.clone(),
            health_url: settings.health_url.clone(),
            timeout: settings.timeout(),
        })
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[async_trait]
impl SearchTransport for SearchClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        debug!("POST {} query={:?}", self.search_url, request.query);

        let response = self
            .client
            .post(&self.search_url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Search service answered {}", status);
            return Err(SearchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(SearchResponse::from_body(&body)?)
    }

    async fn health(&self) -> Result<ServiceStatus, SearchError> {
        let response = self.client.get(&self.health_url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        // The probe only cares about the status; a message is a bonus
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string));

        Ok(ServiceStatus { status, message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header as header_is, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SearchClient {
        SearchClient::with_settings(&ServiceSettings {
            search_url: format!("{}/search", server.uri()),
            health_url: format!("{}/", server.uri()),
            ..ServiceSettings::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_client_creation() {
        let client = SearchClient::with_settings(&ServiceSettings::default()).unwrap();
        assert_eq!(
            client.search_url(),
            "https://faculty-connect.onrender.com/search"
        );
        assert!(client.timeout().is_none());
    }

    #[tokio::test]
    async fn test_search_posts_query_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header_is("content-type", "application/json"))
            .and(body_json(json!({ "query": "machine learning" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{ "name": "A", "score": 0.9 }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .search(&SearchRequest::new("machine learning"))
            .await
            .unwrap();

        assert_eq!(response.records().map(|r| r.len()), Some(1));
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "detail": "DB Error" })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .search(&SearchRequest::new("x"))
            .await
            .unwrap_err();

        assert_eq!(err, SearchError::Status(500));
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>waking up</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .search(&SearchRequest::new("x"))
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_is_transport_error() {
        let client = SearchClient::with_settings(&ServiceSettings {
            search_url: "http://127.0.0.1:1/search".to_string(),
            ..ServiceSettings::default()
        })
        .unwrap();

        let err = client.search(&SearchRequest::new("x")).await.unwrap_err();
        assert!(matches!(err, SearchError::Transport(_)));
    }

    #[tokio::test]
    async fn test_health_probe() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "message": "API is online!" })),
            )
            .mount(&server)
            .await;

        let status = client_for(&server).health().await.unwrap();
        assert!(status.is_online());
        assert_eq!(status.message.as_deref(), Some("API is online!"));
    }
}
