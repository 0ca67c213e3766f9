//! Request authentication port definition.

use async_trait::async_trait;
use url::Url;

use crate::domain::entities::{AuthenticatedRequest, HostingContext};
use crate::domain::errors::MediaError;

/// Port that turns a URL into a request carrying the right credentials.
#[async_trait]
pub trait RequestAuthenticator: Send + Sync {
    /// Builds an authenticated request for `url`.
    ///
    /// Fails with [`MediaError::Authentication`] when credentials are
    /// missing or unusable for the target host.
    async fn authenticate(
        &self,
        url: &Url,
        hosting: &HostingContext,
    ) -> Result<AuthenticatedRequest, MediaError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Mock authenticator for testing.
    pub struct MockAuthenticator {
        should_succeed: Arc<AtomicBool>,
        calls: AtomicUsize,
    }

    impl MockAuthenticator {
        /// Creates new mock.
        pub fn new(should_succeed: bool) -> Self {
            Self {
                should_succeed: Arc::new(AtomicBool::new(should_succeed)),
                calls: AtomicUsize::new(0),
            }
        }

        /// Number of authenticate calls.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RequestAuthenticator for MockAuthenticator {
        async fn authenticate(
            &self,
            url: &Url,
            _hosting: &HostingContext,
        ) -> Result<AuthenticatedRequest, MediaError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.should_succeed.load(Ordering::SeqCst) {
                Ok(AuthenticatedRequest::plain(url.clone()))
            } else {
                Err(MediaError::authentication("mock rejection"))
            }
        }
    }
}
