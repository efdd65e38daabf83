//! Backend for a small DevSecOps blog.
//!
//! A single `articles` table behind a REST API: list with category and
//! search filters, fetch one, like, list categories, aggregate stats, and
//! health checks. [`client`] holds the typed consumer of that API.

pub mod client;
pub mod config;
pub mod server;
pub mod storage;
pub mod util;
