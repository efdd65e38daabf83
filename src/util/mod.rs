//! Utility functions shared by the client and the CLI.
//!
//! - **URL validation**: checks the API base URL before any request is made
//! - **Dates**: French long-form date rendering used on article cards

mod date;
mod url_validator;

pub use date::format_date_fr;
pub use url_validator::{validate_base_url, UrlValidationError};
