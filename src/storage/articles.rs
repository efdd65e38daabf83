use anyhow::Result;

use super::filter::{matches_needle, ArticleFilter, ARTICLE_COLUMNS};
use super::schema::Database;
use super::types::{Article, ArticleDbRow};

impl Database {
    // ========================================================================
    // Article Queries
    // ========================================================================

    /// List every article matching `filter`, in table order. No pagination.
    ///
    /// The category narrows the SELECT; the search term is matched on the
    /// fetched rows so case folding covers accented capitals.
    pub async fn list_articles(&self, filter: &ArticleFilter) -> Result<Vec<Article>> {
        let mut builder = filter.to_query();
        tracing::debug!(
            category = ?filter.active_category(),
            search = ?filter.active_search(),
            sql = %builder.sql(),
            "list_articles"
        );

        let rows: Vec<ArticleDbRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        let articles = rows.into_iter().map(ArticleDbRow::into_article);

        Ok(match filter.needle() {
            Some(needle) => articles
                .filter(|article| matches_needle(article, &needle))
                .collect(),
            None => articles.collect(),
        })
    }

    /// Get a single article by its ID
    pub async fn get_article(&self, article_id: i64) -> Result<Option<Article>> {
        let row = sqlx::query_as::<_, ArticleDbRow>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = ?"
        ))
        .bind(article_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ArticleDbRow::into_article))
    }

    // ========================================================================
    // Article Mutations
    // ========================================================================

    /// Atomically increment the like counter, returning the new value.
    ///
    /// Uses SQLite's RETURNING clause so the increment and the read are one
    /// statement; concurrent callers never lose an update. Returns `None` when
    /// no article has this id.
    pub async fn like_article(&self, article_id: i64) -> Result<Option<i64>> {
        let row: Option<(i64,)> =
            sqlx::query_as("UPDATE articles SET likes = likes + 1 WHERE id = ? RETURNING likes")
                .bind(article_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(likes,)| likes))
    }
}
