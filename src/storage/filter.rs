//! Article list filtering.
//!
//! [`ArticleFilter`] normalizes the raw `category` / `search` request
//! parameters once. The category predicate goes into a
//! [`sqlx::QueryBuilder`] as a bound parameter; the search predicate is
//! applied to the fetched rows with Unicode case folding, which SQLite's
//! ASCII-only `lower()` cannot do.

use sqlx::{QueryBuilder, Sqlite};

use super::types::Article;

/// Category sentinel meaning "no category filter"
pub const ALL_CATEGORIES: &str = "Tous";

pub(crate) const ARTICLE_COLUMNS: &str =
    "id, title, content, author, category, read_time, likes, created_at, tags";

/// Optional constraints narrowing the article list.
///
/// - A category equal to [`ALL_CATEGORIES`] is dropped.
/// - An empty search term is dropped. The term is not trimmed, so `" "`
///   is a real search for a space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    category: Option<String>,
    search: Option<String>,
}

impl ArticleFilter {
    pub fn new(category: Option<&str>, search: Option<&str>) -> Self {
        let category = category
            .filter(|c| *c != ALL_CATEGORIES)
            .map(str::to_string);
        let search = search.filter(|s| !s.is_empty()).map(str::to_string);
        Self { category, search }
    }

    /// Filter on category only
    pub fn category(category: &str) -> Self {
        Self::new(Some(category), None)
    }

    /// Filter on search term only
    pub fn search(term: &str) -> Self {
        Self::new(None, Some(term))
    }

    pub fn active_category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn active_search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// True when neither predicate is active
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.search.is_none()
    }

    /// Build the SELECT for the category predicate.
    ///
    /// No ORDER BY: rows come back in the table's natural order.
    pub(crate) fn to_query(&self) -> QueryBuilder<'static, Sqlite> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {ARTICLE_COLUMNS} FROM articles"));

        if let Some(category) = &self.category {
            builder.push(" WHERE category = ");
            builder.push_bind(category.clone());
        }

        builder
    }

    /// Lowercased search term, if a search is active
    pub fn needle(&self) -> Option<String> {
        self.search.as_deref().map(str::to_lowercase)
    }

    /// Case-insensitive substring test of the search term against the title,
    /// the content, and each tag. Always true without a search term.
    pub fn matches(&self, article: &Article) -> bool {
        match self.needle() {
            Some(needle) => matches_needle(article, &needle),
            None => true,
        }
    }
}

pub(crate) fn matches_needle(article: &Article, needle: &str) -> bool {
    article.title.to_lowercase().contains(needle)
        || article.content.to_lowercase().contains(needle)
        || article
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    fn article(title: &str, content: &str, tags: &[&str]) -> Article {
        Article {
            id: 1,
            title: title.to_string(),
            content: content.to_string(),
            author: "Auteur".to_string(),
            category: "Sécurité".to_string(),
            read_time: 5,
            likes: 0,
            created_at: Utc::now(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_default_has_no_where_clause() {
        let filter = ArticleFilter::default();
        assert!(filter.is_empty());
        let query = filter.to_query();
        assert!(!query.sql().contains("WHERE"));
        assert_eq!(
            query.sql(),
            "SELECT id, title, content, author, category, read_time, likes, created_at, tags FROM articles"
        );
    }

    #[test]
    fn test_all_sentinel_disables_category() {
        let filter = ArticleFilter::category(ALL_CATEGORIES);
        assert!(filter.is_empty());
        assert!(!filter.to_query().sql().contains("WHERE"));
    }

    #[test]
    fn test_empty_search_is_absent() {
        let filter = ArticleFilter::search("");
        assert!(filter.is_empty());
        assert_eq!(filter.active_search(), None);
    }

    #[test]
    fn test_whitespace_search_is_kept() {
        let filter = ArticleFilter::search("  ");
        assert_eq!(filter.active_search(), Some("  "));
    }

    #[test]
    fn test_category_predicate_is_bound() {
        let filter = ArticleFilter::category("Conteneurs");
        let query = filter.to_query();
        assert!(query.sql().ends_with(" WHERE category = ?"));
        assert!(!query.sql().contains("Conteneurs"));
    }

    #[test]
    fn test_search_stays_out_of_sql() {
        let filter = ArticleFilter::new(Some("CI/CD"), Some("Docker"));
        let query = filter.to_query();
        assert!(query.sql().ends_with(" WHERE category = ?"));
        assert!(!query.sql().to_lowercase().contains("docker"));
        assert_eq!(filter.needle().as_deref(), Some("docker"));
    }

    #[test]
    fn test_matches_title_content_and_tags() {
        let filter = ArticleFilter::search("docker");
        assert!(filter.matches(&article("Docker en prod", "", &[])));
        assert!(filter.matches(&article("", "Images DOCKER minimales", &[])));
        assert!(filter.matches(&article("", "", &["docker-compose"])));
        assert!(!filter.matches(&article("Podman", "rootless", &["oci"])));
    }

    #[test]
    fn test_matches_folds_accented_uppercase() {
        let stored = article("État des lieux", "", &["SÉCURITÉ"]);
        assert!(ArticleFilter::search("état").matches(&stored));
        assert!(ArticleFilter::search("ÉTAT").matches(&stored));
        assert!(ArticleFilter::search("sécurité").matches(&stored));
    }

    #[test]
    fn test_matches_without_search() {
        assert!(ArticleFilter::category("CI/CD").matches(&article("x", "y", &[])));
    }

    proptest! {
        #[test]
        fn prop_user_input_never_reaches_sql(term in "[a-zA-Z0-9';%_ -]{1,40}") {
            let category = format!("cat-{term}");
            let search = format!("zz{term}");
            let filter = ArticleFilter::new(Some(&category), Some(&search));
            let query = filter.to_query();
            let sql = query.sql();
            prop_assert!(!sql.contains(&category));
            prop_assert!(!sql.contains(&search));
        }

        #[test]
        fn prop_non_sentinel_category_is_kept(category in "[A-Za-z/ ]{1,20}") {
            prop_assume!(category != ALL_CATEGORIES);
            let filter = ArticleFilter::category(&category);
            prop_assert_eq!(filter.active_category(), Some(category.as_str()));
        }
    }
}
