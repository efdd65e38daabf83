//! Consumer side of the REST API.
//!
//! [`BlogClient`] is a thin typed wrapper over the endpoints; [`BlogView`]
//! holds the page state the frontend renders from.

mod api;
mod view;

pub use api::{BlogClient, ClientError, DEFAULT_BASE_URL};
pub use view::BlogView;
