mod articles;
mod filter;
mod schema;
mod seed;
mod stats;
mod types;

pub use filter::{ArticleFilter, ALL_CATEGORIES};
pub use schema::{Database, DEFAULT_MAX_CONNECTIONS};
pub use seed::seed_articles;
pub use types::{Article, BlogStats, DatabaseError, NewArticle};
