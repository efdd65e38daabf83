use anyhow::Result;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;
use std::time::Duration;

use super::seed::seed_articles;
use super::types::{DatabaseError, NewArticle};

/// Default pool size when the caller does not configure one
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

// ============================================================================
// Database
// ============================================================================

/// Handle to the article store.
///
/// Cheap to clone; every clone shares the same connection pool. Constructed
/// once in `main` and handed to the HTTP layer as router state.
#[derive(Clone)]
pub struct Database {
    pub(crate) pool: SqlitePool,
}

/// Turn a `DATABASE_URL` value or a bare path into a sqlx connection URL
fn connection_url(url_or_path: &str) -> String {
    if url_or_path.starts_with("sqlite:") {
        url_or_path.to_string()
    } else {
        format!("sqlite:{}?mode=rwc", url_or_path)
    }
}

impl Database {
    /// Open the store with the default pool size and run migrations.
    ///
    /// Accepts either a full `sqlite:` URL or a plain file path; `:memory:`
    /// gives a private in-memory database shared by all pool connections.
    pub async fn open(url_or_path: &str) -> Result<Self, DatabaseError> {
        Self::connect(url_or_path, DEFAULT_MAX_CONNECTIONS).await
    }

    /// Open the store, creating the schema if needed.
    ///
    /// Does not seed; see [`Database::seed_if_empty`].
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Unavailable` if the file cannot be opened or is
    /// locked, `DatabaseError::Migration` if the schema cannot be created.
    pub async fn connect(url_or_path: &str, max_connections: u32) -> Result<Self, DatabaseError> {
        let url = connection_url(url_or_path);

        // busy_timeout=5000: concurrent like increments wait for the write lock
        // instead of failing with SQLITE_BUSY.
        let options = SqliteConnectOptions::from_str(&url)
            .map_err(DatabaseError::from_sqlx)?
            .create_if_missing(true)
            .pragma("busy_timeout", "5000");
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(DatabaseError::from_sqlx)?;

        let db = Self { pool };
        db.migrate()
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;
        tracing::debug!(max_connections, "Article store opened");
        Ok(db)
    }

    /// Create the articles table.
    ///
    /// Uses `IF NOT EXISTS` so re-running on an existing database is a no-op.
    async fn migrate(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS articles (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                author TEXT NOT NULL,
                category TEXT NOT NULL,
                read_time INTEGER NOT NULL,
                likes INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                tags TEXT NOT NULL DEFAULT '[]'
            )
        "#,
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_articles_category ON articles(category)")
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Insert the built-in sample articles if the table is empty.
    ///
    /// Returns the number of rows inserted.
    pub async fn seed_if_empty(&self) -> Result<usize> {
        self.seed_with(&seed_articles()).await
    }

    /// Insert `articles` if the table is empty, returning the number inserted.
    ///
    /// The emptiness check and the inserts share one transaction, and each
    /// insert is keyed on the article's fixed id with `ON CONFLICT DO NOTHING`,
    /// so two processes seeding the same file never duplicate rows.
    pub async fn seed_with(&self, articles: &[NewArticle]) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM articles")
            .fetch_one(&mut *tx)
            .await?;
        if count > 0 {
            tracing::debug!(existing = count, "Article table already populated, skipping seed");
            tx.commit().await?;
            return Ok(0);
        }

        let mut inserted = 0;
        for article in articles {
            let result = sqlx::query(
                r#"
                INSERT INTO articles (id, title, content, author, category, read_time, likes, tags)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(id) DO NOTHING
            "#,
            )
            .bind(article.id)
            .bind(&article.title)
            .bind(&article.content)
            .bind(&article.author)
            .bind(&article.category)
            .bind(article.read_time)
            .bind(article.likes)
            .bind(sqlx::types::Json(&article.tags))
            .execute(&mut *tx)
            .await?;

            inserted += result.rows_affected() as usize;
        }

        tx.commit().await?;
        tracing::info!(inserted, "Seeded article table");
        Ok(inserted)
    }

    /// Cheap round-trip used by the detailed health check
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close every pooled connection; called on graceful shutdown
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
