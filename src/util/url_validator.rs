use thiserror::Error;
use url::Url;

/// Errors that can occur while validating an API base URL.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
    /// Query strings and fragments would be mangled by path joining.
    #[error("Base URL must not carry a query or fragment")]
    HasQueryOrFragment,
}

/// Validates the base URL the client talks to.
///
/// The API commonly lives on localhost, so loopback and private addresses
/// are accepted. Rejected:
/// - Non-HTTP(S) schemes (e.g., `file://`, `ftp://`)
/// - URLs without a host
/// - URLs carrying a query string or fragment
///
/// The returned URL always ends with `/`, so relative joins such as
/// `base.join("api/articles")` keep any path prefix.
///
/// # Examples
///
/// ```
/// use blog_api::util::validate_base_url;
///
/// let url = validate_base_url("http://localhost:3001").unwrap();
/// assert_eq!(url.as_str(), "http://localhost:3001/");
///
/// let url = validate_base_url("https://example.com/blog").unwrap();
/// assert_eq!(url.join("api/stats").unwrap().as_str(), "https://example.com/blog/api/stats");
///
/// assert!(validate_base_url("file:///etc/passwd").is_err());
/// ```
pub fn validate_base_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let mut url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlValidationError::MissingHost),
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(UrlValidationError::HasQueryOrFragment);
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
