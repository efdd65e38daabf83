use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Database-specific errors with user-friendly messages
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The database file could not be opened or is locked by another writer
    #[error("Database is unavailable or locked: {0}")]
    Unavailable(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Classify a sqlx error raised while opening the pool
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        let error_string = err.to_string().to_lowercase();

        // SQLITE_BUSY (5), SQLITE_LOCKED (6), SQLITE_CANTOPEN (14)
        if error_string.contains("database is locked")
            || error_string.contains("database table is locked")
            || error_string.contains("unable to open database file")
        {
            return DatabaseError::Unavailable(err.to_string());
        }

        DatabaseError::Other(err)
    }
}

// ============================================================================
// Helper Types
// ============================================================================

/// A seed article inserted with a fixed id when the table is empty
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub category: String,
    pub read_time: i64,
    pub likes: i64,
    pub tags: Vec<String>,
}

/// Internal row type for Article queries (used by sqlx FromRow)
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ArticleDbRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub category: String,
    pub read_time: i64,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
    pub tags: Json<Vec<String>>,
}

impl ArticleDbRow {
    pub(crate) fn into_article(self) -> Article {
        Article {
            id: self.id,
            title: self.title,
            content: self.content,
            author: self.author,
            category: self.category,
            read_time: self.read_time,
            likes: self.likes,
            created_at: self.created_at,
            tags: self.tags.0,
        }
    }
}

// ============================================================================
// Data Structures
// ============================================================================

/// A blog post as stored and as served over the API.
///
/// Serialized with camelCase keys (`readTime`, `createdAt`), which is the
/// shape the frontend consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub category: String,
    pub read_time: i64,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<String>,
}

/// Aggregates over the whole article table, recomputed on each call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogStats {
    pub total_articles: i64,
    pub total_likes: i64,
    pub categories: i64,
    pub average_read_time: i64,
}
