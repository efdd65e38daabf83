use crate::storage::{Article, ArticleFilter, BlogStats, ALL_CATEGORIES};

use super::api::BlogClient;

/// Client-side state of the blog page.
///
/// Mirrors what the single-page frontend keeps: the article list, the
/// category list, the stats header and the current filter. Every fetch
/// failure is logged and leaves the previous state in place, so a flaky
/// backend shows stale data rather than an error.
#[derive(Debug)]
pub struct BlogView {
    client: BlogClient,
    articles: Vec<Article>,
    categories: Vec<String>,
    stats: Option<BlogStats>,
    loading: bool,
    selected_category: String,
    search_term: String,
}

impl BlogView {
    pub fn new(client: BlogClient) -> Self {
        Self {
            client,
            articles: Vec::new(),
            categories: Vec::new(),
            stats: None,
            loading: true,
            selected_category: ALL_CATEGORIES.to_string(),
            search_term: String::new(),
        }
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn stats(&self) -> Option<&BlogStats> {
        self.stats.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn selected_category(&self) -> &str {
        &self.selected_category
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// The filter the article list is currently fetched with
    pub fn filter(&self) -> ArticleFilter {
        ArticleFilter::new(Some(&self.selected_category), Some(&self.search_term))
    }

    /// Initial page load: articles, categories and stats fetched concurrently.
    ///
    /// All three are replaced together or not at all. `loading` is cleared
    /// either way.
    pub async fn load(&mut self) {
        let all = ArticleFilter::default();
        let result = futures::try_join!(
            self.client.articles(&all),
            self.client.categories(),
            self.client.stats(),
        );

        match result {
            Ok((articles, categories, stats)) => {
                tracing::debug!(
                    articles = articles.len(),
                    categories = categories.len(),
                    "Initial blog data loaded"
                );
                self.articles = articles;
                self.categories = categories;
                self.stats = Some(stats);
            }
            Err(e) => tracing::error!(error = %e, "Failed to load blog data"),
        }
        self.loading = false;
    }

    /// Select a category (or [`ALL_CATEGORIES`]) and refetch the list
    pub async fn select_category(&mut self, category: &str) {
        self.selected_category = category.to_string();
        self.refresh_articles().await;
    }

    /// Change the search term and refetch the list
    pub async fn set_search(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.refresh_articles().await;
    }

    /// Refetch the article list with the current filter
    pub async fn refresh_articles(&mut self) {
        match self.client.articles(&self.filter()).await {
            Ok(articles) => self.articles = articles,
            Err(e) => tracing::error!(error = %e, "Failed to fetch articles"),
        }
    }

    /// Like an article and patch its count in the local list.
    ///
    /// Returns the new count when the request succeeded.
    pub async fn like(&mut self, article_id: i64) -> Option<i64> {
        match self.client.like(article_id).await {
            Ok(likes) => {
                if let Some(article) = self.articles.iter_mut().find(|a| a.id == article_id) {
                    article.likes = likes;
                }
                Some(likes)
            }
            Err(e) => {
                tracing::error!(error = %e, article_id, "Failed to like article");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn article_json(id: i64, category: &str, likes: i64) -> serde_json::Value {
        json!({
            "id": id,
            "title": format!("Article {id}"),
            "content": "Contenu",
            "author": "Auteur",
            "category": category,
            "readTime": 4,
            "likes": likes,
            "createdAt": "2024-01-15T10:00:00Z",
            "tags": []
        })
    }

    async fn mount_initial(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                article_json(1, "Sécurité", 12),
                article_json(2, "CI/CD", 24)
            ])))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/categories"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!(["Tous", "Sécurité", "CI/CD"])),
            )
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "totalArticles": 2,
                "totalLikes": 36,
                "categories": 2,
                "averageReadTime": 4
            })))
            .mount(server)
            .await;
    }

    fn view_for(server: &MockServer) -> BlogView {
        BlogView::new(BlogClient::new(&server.uri()).unwrap())
    }

    #[tokio::test]
    async fn test_initial_state() {
        let server = MockServer::start().await;
        let view = view_for(&server);
        assert!(view.is_loading());
        assert_eq!(view.selected_category(), "Tous");
        assert_eq!(view.search_term(), "");
        assert!(view.filter().is_empty());
    }

    #[tokio::test]
    async fn test_load_populates_everything() {
        let server = MockServer::start().await;
        mount_initial(&server).await;

        let mut view = view_for(&server);
        view.load().await;

        assert!(!view.is_loading());
        assert_eq!(view.articles().len(), 2);
        assert_eq!(view.categories(), ["Tous", "Sécurité", "CI/CD"]);
        assert_eq!(view.stats().map(|s| s.total_likes), Some(36));
    }

    #[tokio::test]
    async fn test_load_failure_keeps_state_and_clears_loading() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut view = view_for(&server);
        view.load().await;

        assert!(!view.is_loading());
        assert!(view.articles().is_empty());
        assert!(view.categories().is_empty());
        assert!(view.stats().is_none());
    }

    #[tokio::test]
    async fn test_select_category_refetches_with_param() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .and(query_param("category", "CI/CD"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([article_json(2, "CI/CD", 24)])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut view = view_for(&server);
        view.select_category("CI/CD").await;

        assert_eq!(view.selected_category(), "CI/CD");
        assert_eq!(view.articles().len(), 1);
        assert_eq!(view.articles()[0].id, 2);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_stale_articles() {
        let server = MockServer::start().await;
        mount_initial(&server).await;

        let mut view = view_for(&server);
        view.load().await;
        assert_eq!(view.articles().len(), 2);

        server.reset().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        view.set_search("docker").await;
        assert_eq!(view.search_term(), "docker");
        assert_eq!(view.articles().len(), 2);
    }

    #[tokio::test]
    async fn test_like_patches_only_that_article() {
        let server = MockServer::start().await;
        mount_initial(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/articles/1/like"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "likes": 13 })))
            .mount(&server)
            .await;

        let mut view = view_for(&server);
        view.load().await;

        assert_eq!(view.like(1).await, Some(13));
        assert_eq!(view.articles()[0].likes, 13);
        assert_eq!(view.articles()[1].likes, 24);
    }

    #[tokio::test]
    async fn test_like_failure_leaves_counts() {
        let server = MockServer::start().await;
        mount_initial(&server).await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let mut view = view_for(&server);
        view.load().await;

        assert_eq!(view.like(1).await, None);
        assert_eq!(view.articles()[0].likes, 12);
    }
}
