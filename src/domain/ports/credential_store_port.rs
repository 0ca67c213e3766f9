//! Credential storage port definition.

use async_trait::async_trait;

use crate::domain::entities::{AccessToken, BasicAuthCredentials};
use crate::domain::errors::CredentialError;

/// Port for credential persistence operations.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Retrieves the managed-platform access token.
    async fn access_token(&self) -> Result<Option<AccessToken>, CredentialError>;

    /// Stores the managed-platform access token.
    async fn store_access_token(&self, token: &AccessToken) -> Result<(), CredentialError>;

    /// Retrieves basic auth credentials for a self-hosted host.
    async fn basic_auth(&self, host: &str) -> Result<Option<BasicAuthCredentials>, CredentialError>;

    /// Stores basic auth credentials for a self-hosted host.
    async fn store_basic_auth(
        &self,
        host: &str,
        credentials: &BasicAuthCredentials,
    ) -> Result<(), CredentialError>;

    /// Deletes the access token and the credentials stored for `hosts`.
    async fn clear(&self, hosts: &[String]) -> Result<(), CredentialError>;
}
