//! Credential-injecting request authenticator.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::HeaderValue;
use tracing::{debug, warn};
use url::Url;

use crate::domain::entities::{AuthenticatedRequest, HostingContext};
use crate::domain::errors::MediaError;
use crate::domain::ports::{CredentialStore, RequestAuthenticator};

/// Builds requests carrying a bearer token or basic auth, depending on
/// where the media is hosted.
pub struct CredentialAuthenticator {
    store: Arc<dyn CredentialStore>,
}

impl CredentialAuthenticator {
    /// Creates authenticator reading from `store`.
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    async fn bearer(&self, url: &Url) -> Result<AuthenticatedRequest, MediaError> {
        let token = self
            .store
            .access_token()
            .await?
            .ok_or_else(|| MediaError::authentication("no access token stored for private site"))?;

        let value = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
            .map_err(|e| MediaError::authentication(format!("access token is not a valid header: {e}")))?;

        debug!(host = url.host_str().unwrap_or_default(), "Using bearer token");
        Ok(AuthenticatedRequest::plain(url.clone()).with_authorization(value))
    }

    async fn basic(&self, url: &Url) -> Result<AuthenticatedRequest, MediaError> {
        let host = url
            .host_str()
            .ok_or_else(|| MediaError::authentication(format!("no host in {url}")))?;

        let credentials = self.store.basic_auth(host).await?.ok_or_else(|| {
            warn!(host, "Basic auth expected but no credentials stored");
            MediaError::authentication(format!("no basic auth credentials stored for {host}"))
        })?;

        let encoded = STANDARD.encode(credentials.to_secret().as_bytes());
        let value = HeaderValue::from_str(&format!("Basic {encoded}"))
            .map_err(|e| MediaError::authentication(format!("invalid basic auth header: {e}")))?;

        debug!(host, "Using basic auth credentials");
        Ok(AuthenticatedRequest::plain(url.clone()).with_authorization(value))
    }
}

#[async_trait]
impl RequestAuthenticator for CredentialAuthenticator {
    async fn authenticate(
        &self,
        url: &Url,
        hosting: &HostingContext,
    ) -> Result<AuthenticatedRequest, MediaError> {
        if hosting.is_file_local || url.scheme() == "file" {
            return Ok(AuthenticatedRequest::plain(url.clone()));
        }
        if hosting.is_managed_private() {
            return self.bearer(url).await;
        }
        if hosting.is_self_hosted_basic_auth() {
            return self.basic(url).await;
        }
        Ok(AuthenticatedRequest::plain(url.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{AccessToken, BasicAuthCredentials};
    use crate::domain::errors::MediaErrorKind;
    use crate::domain::ports::mocks::MockCredentialStore;
    use reqwest::header::AUTHORIZATION;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn authorization(request: &AuthenticatedRequest) -> Option<&str> {
        request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
    }

    #[tokio::test]
    async fn test_public_request_has_no_credentials() {
        let store = MockCredentialStore::with_token(AccessToken::new("tok").unwrap());
        let auth = CredentialAuthenticator::new(Arc::new(store));

        let request = auth
            .authenticate(&url("https://example.com/a.jpg"), &HostingContext::public())
            .await
            .unwrap();

        assert!(!request.is_authenticated());
    }

    #[tokio::test]
    async fn test_managed_private_uses_bearer_token() {
        let store = MockCredentialStore::with_token(AccessToken::new("secret-token").unwrap());
        let auth = CredentialAuthenticator::new(Arc::new(store));

        let request = auth
            .authenticate(
                &url("https://example.files.wordpress.com/a.jpg"),
                &HostingContext::managed_private(),
            )
            .await
            .unwrap();

        assert_eq!(authorization(&request), Some("Bearer secret-token"));
    }

    #[tokio::test]
    async fn test_managed_private_without_token_fails() {
        let auth = CredentialAuthenticator::new(Arc::new(MockCredentialStore::new()));

        let err = auth
            .authenticate(&url("https://example.com/a.jpg"), &HostingContext::managed_private())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), MediaErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_self_hosted_uses_basic_auth_for_host() {
        let store = MockCredentialStore::with_basic_auth(
            "blog.example.org",
            BasicAuthCredentials::new("editor", "hunter2").unwrap(),
        );
        let auth = CredentialAuthenticator::new(Arc::new(store));

        let request = auth
            .authenticate(
                &url("https://blog.example.org/wp-content/a.jpg"),
                &HostingContext::self_hosted_basic_auth(),
            )
            .await
            .unwrap();

        assert_eq!(authorization(&request), Some("Basic ZWRpdG9yOmh1bnRlcjI="));
        assert!(request.headers().get(AUTHORIZATION).unwrap().is_sensitive());
    }

    #[tokio::test]
    async fn test_self_hosted_other_host_fails() {
        let store = MockCredentialStore::with_basic_auth(
            "blog.example.org",
            BasicAuthCredentials::new("editor", "hunter2").unwrap(),
        );
        let auth = CredentialAuthenticator::new(Arc::new(store));

        let err = auth
            .authenticate(
                &url("https://other.example.org/a.jpg"),
                &HostingContext::self_hosted_basic_auth(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), MediaErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_local_file_skips_credentials() {
        let auth = CredentialAuthenticator::new(Arc::new(MockCredentialStore::new()));

        let request = auth
            .authenticate(&url("file:///tmp/a.jpg"), &HostingContext::managed_private())
            .await
            .unwrap();

        assert!(!request.is_authenticated());
    }
}
