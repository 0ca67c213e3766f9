//! Authenticated request description.

use std::fmt;

use reqwest::header::{AUTHORIZATION, COOKIE, HeaderMap, HeaderValue};
use url::Url;

/// A request ready for the transport, with credentials already injected.
#[derive(Clone)]
pub struct AuthenticatedRequest {
    url: Url,
    headers: HeaderMap,
}

impl AuthenticatedRequest {
    /// Request with no credentials.
    #[must_use]
    pub fn plain(url: Url) -> Self {
        Self {
            url,
            headers: HeaderMap::new(),
        }
    }

    /// Adds the `Authorization` header.
    #[must_use]
    pub fn with_authorization(mut self, mut value: HeaderValue) -> Self {
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        self
    }

    /// Returns the request URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the headers to send.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns true if credentials are attached.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.headers.contains_key(AUTHORIZATION) || self.headers.contains_key(COOKIE)
    }
}

impl fmt::Debug for AuthenticatedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedRequest")
            .field("url", &self.url.as_str())
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
