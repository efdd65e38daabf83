use anyhow::Result;

use super::filter::ALL_CATEGORIES;
use super::schema::Database;
use super::types::BlogStats;

impl Database {
    // ========================================================================
    // Aggregates
    // ========================================================================

    /// Distinct categories in database order, prefixed with the "all" sentinel
    pub async fn list_categories(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT DISTINCT category FROM articles")
            .fetch_all(&self.pool)
            .await?;

        let mut categories = Vec::with_capacity(rows.len() + 1);
        categories.push(ALL_CATEGORIES.to_string());
        categories.extend(rows.into_iter().map(|(category,)| category));
        Ok(categories)
    }

    /// Recompute the blog-wide aggregates. Every value is 0 on an empty table.
    pub async fn stats(&self) -> Result<BlogStats> {
        let (total_articles, total_likes, categories, average_read_time): (i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    COUNT(*),
                    COALESCE(SUM(likes), 0),
                    COUNT(DISTINCT category),
                    CAST(COALESCE(ROUND(AVG(read_time)), 0) AS INTEGER)
                FROM articles
            "#,
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(BlogStats {
            total_articles,
            total_likes,
            categories,
            average_read_time,
        })
    }
}
