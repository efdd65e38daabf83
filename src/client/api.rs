use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::server::health::HealthStatus;
use crate::server::routes::LikeResponse;
use crate::storage::{Article, ArticleFilter, BlogStats};
use crate::util::{validate_base_url, UrlValidationError};

/// Where the frontend expects the API in development
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request timed out after 20s")]
    Timeout,
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Article not found")]
    NotFound,
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] UrlValidationError),
    #[error("Invalid endpoint path: {0}")]
    InvalidPath(#[from] url::ParseError),
}

impl ClientError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Network(err)
        }
    }
}

/// Typed client for the blog REST API
#[derive(Debug, Clone)]
pub struct BlogClient {
    http: reqwest::Client,
    base: Url,
}

impl BlogClient {
    /// Build a client with a 20s request timeout.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ClientError::Network)?;
        Self::with_http_client(http, base_url)
    }

    /// Build a client around an existing `reqwest::Client`
    pub fn with_http_client(http: reqwest::Client, base_url: &str) -> Result<Self, ClientError> {
        let base = validate_base_url(base_url)?;
        Ok(Self { http, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path)?)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await.map_err(ClientError::from_reqwest)?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(ClientError::NotFound),
            status => return Err(ClientError::HttpStatus(status.as_u16())),
        }

        response.json().await.map_err(ClientError::from_reqwest)
    }

    /// `GET /api/articles`. Only active filters are sent: no `category`
    /// for the "all" sentinel, no `search` for an empty term.
    pub async fn articles(&self, filter: &ArticleFilter) -> Result<Vec<Article>, ClientError> {
        let mut url = self.endpoint("api/articles")?;
        if !filter.is_empty() {
            let mut pairs = url.query_pairs_mut();
            if let Some(category) = filter.active_category() {
                pairs.append_pair("category", category);
            }
            if let Some(search) = filter.active_search() {
                pairs.append_pair("search", search);
            }
        }

        tracing::debug!(url = %url, "Fetching articles");
        self.send_json(self.http.get(url)).await
    }

    /// `GET /api/articles/{id}`
    pub async fn article(&self, id: i64) -> Result<Article, ClientError> {
        let url = self.endpoint(&format!("api/articles/{id}"))?;
        self.send_json(self.http.get(url)).await
    }

    /// `POST /api/articles/{id}/like`, returning the new like count
    pub async fn like(&self, id: i64) -> Result<i64, ClientError> {
        let url = self.endpoint(&format!("api/articles/{id}/like"))?;
        let body: LikeResponse = self.send_json(self.http.post(url)).await?;
        Ok(body.likes)
    }

    /// `GET /api/categories`
    pub async fn categories(&self) -> Result<Vec<String>, ClientError> {
        let url = self.endpoint("api/categories")?;
        self.send_json(self.http.get(url)).await
    }

    /// `GET /api/stats`
    pub async fn stats(&self) -> Result<BlogStats, ClientError> {
        let url = self.endpoint("api/stats")?;
        self.send_json(self.http.get(url)).await
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = self.endpoint("health")?;
        self.send_json(self.http.get(url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn article_json(id: i64, likes: i64) -> serde_json::Value {
        json!({
            "id": id,
            "title": format!("Article {id}"),
            "content": "Contenu",
            "author": "Auteur",
            "category": "Sécurité",
            "readTime": 5,
            "likes": likes,
            "createdAt": "2024-01-15T10:00:00Z",
            "tags": ["docker"]
        })
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = BlogClient::new("ftp://example.com");
        assert!(matches!(result, Err(ClientError::InvalidBaseUrl(_))));
    }

    #[tokio::test]
    async fn test_articles_without_filter_sends_no_params() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([article_json(1, 3)])))
            .mount(&mock_server)
            .await;

        let client = BlogClient::new(&mock_server.uri()).unwrap();
        let articles = client
            .articles(&ArticleFilter::new(Some("Tous"), Some("")))
            .await
            .unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].read_time, 5);

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.query(), None);
    }

    #[tokio::test]
    async fn test_articles_with_filter_sends_params() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .and(query_param("category", "CI/CD"))
            .and(query_param("search", "docker swarm"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = BlogClient::new(&mock_server.uri()).unwrap();
        let articles = client
            .articles(&ArticleFilter::new(Some("CI/CD"), Some("docker swarm")))
            .await
            .unwrap();
        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn test_like_returns_count() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/articles/7/like"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "likes": 13 })))
            .mount(&mock_server)
            .await;

        let client = BlogClient::new(&mock_server.uri()).unwrap();
        assert_eq!(client.like(7).await.unwrap(), 13);
    }

    #[tokio::test]
    async fn test_article_not_found() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "error": "Article non trouvé" })),
            )
            .mount(&mock_server)
            .await;

        let client = BlogClient::new(&mock_server.uri()).unwrap();
        assert!(matches!(client.article(99).await, Err(ClientError::NotFound)));
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = BlogClient::new(&mock_server.uri()).unwrap();
        assert!(matches!(
            client.stats().await,
            Err(ClientError::HttpStatus(500))
        ));
    }

    #[tokio::test]
    async fn test_stats_and_categories() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "totalArticles": 4,
                "totalLikes": 85,
                "categories": 3,
                "averageReadTime": 7
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/categories"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!(["Tous", "Sécurité", "CI/CD"])),
            )
            .mount(&mock_server)
            .await;

        let client = BlogClient::new(&mock_server.uri()).unwrap();
        let stats = client.stats().await.unwrap();
        assert_eq!(stats.total_likes, 85);
        assert_eq!(stats.average_read_time, 7);

        let categories = client.categories().await.unwrap();
        assert_eq!(categories[0], "Tous");
    }

    #[tokio::test]
    async fn test_base_path_prefix_kept() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/blog/api/categories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["Tous"])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = BlogClient::new(&format!("{}/blog", mock_server.uri())).unwrap();
        assert_eq!(client.categories().await.unwrap(), vec!["Tous".to_string()]);
    }

    #[tokio::test]
    async fn test_health_decodes_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "timestamp": "2024-01-15T10:00:00Z",
                "uptime": 12.5,
                "service": "blog-api"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = BlogClient::new(&mock_server.uri()).unwrap();
        let health = client.health().await.unwrap();
        assert_eq!(health.status, "OK");
        assert_eq!(health.service, "blog-api");
        assert_eq!(health.uptime, 12.5);
    }
}
