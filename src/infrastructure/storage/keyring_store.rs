//! Keyring-based credential storage.

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};

use crate::domain::entities::{AccessToken, BasicAuthCredentials};
use crate::domain::errors::CredentialError;
use crate::domain::ports::CredentialStore;

const KEYRING_SERVICE: &str = "media-fetch";
const ACCESS_TOKEN_USER: &str = "access-token";

/// System keyring credential storage adapter.
///
/// The access token lives under one fixed entry; basic auth credentials are
/// stored per host as `username:password`.
pub struct KeyringCredentialStore {
    service: String,
}

impl KeyringCredentialStore {
    /// Creates storage under the default service name.
    #[must_use]
    pub fn new() -> Self {
        Self::with_service(KEYRING_SERVICE)
    }

    /// Creates storage under a custom service name.
    #[must_use]
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, user: &str) -> Result<Entry, CredentialError> {
        Entry::new(&self.service, user)
            .map_err(|e| CredentialError::AccessFailed(format!("failed to access keyring: {e}")))
    }

    fn read(&self, user: &str) -> Result<Option<String>, CredentialError> {
        match self.entry(user)?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => {
                debug!(user, "No credential stored in keyring");
                Ok(None)
            }
            Err(e) => {
                warn!(user, error = %e, "Failed to retrieve credential from keyring");
                Err(CredentialError::RetrievalFailed(e.to_string()))
            }
        }
    }

    fn write(&self, user: &str, secret: &str) -> Result<(), CredentialError> {
        self.entry(user)?.set_password(secret).map_err(|e| {
            warn!(user, error = %e, "Failed to store credential in keyring");
            CredentialError::StorageFailed(e.to_string())
        })
    }

    fn delete(&self, user: &str) -> Result<(), CredentialError> {
        match self.entry(user)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => {
                warn!(user, error = %e, "Failed to delete credential from keyring");
                Err(CredentialError::StorageFailed(e.to_string()))
            }
        }
    }
}

fn basic_user(host: &str) -> String {
    format!("basic:{}", host.to_ascii_lowercase())
}

impl Default for KeyringCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for KeyringCredentialStore {
    async fn access_token(&self) -> Result<Option<AccessToken>, CredentialError> {
        debug!(service = %self.service, "Retrieving access token from keyring");

        match self.read(ACCESS_TOKEN_USER)? {
            Some(secret) => AccessToken::new(secret)
                .map(Some)
                .ok_or_else(|| CredentialError::Malformed(ACCESS_TOKEN_USER.to_string())),
            None => Ok(None),
        }
    }

    async fn store_access_token(&self, token: &AccessToken) -> Result<(), CredentialError> {
        debug!(service = %self.service, "Storing access token in keyring");
        self.write(ACCESS_TOKEN_USER, token.as_str())
    }

    async fn basic_auth(&self, host: &str) -> Result<Option<BasicAuthCredentials>, CredentialError> {
        let user = basic_user(host);

        match self.read(&user)? {
            Some(secret) => BasicAuthCredentials::from_secret(&secret)
                .map(Some)
                .ok_or(CredentialError::Malformed(user)),
            None => Ok(None),
        }
    }

    async fn store_basic_auth(
        &self,
        host: &str,
        credentials: &BasicAuthCredentials,
    ) -> Result<(), CredentialError> {
        debug!(host, "Storing basic auth credentials in keyring");
        self.write(&basic_user(host), &credentials.to_secret())
    }

    async fn clear(&self, hosts: &[String]) -> Result<(), CredentialError> {
        self.delete(ACCESS_TOKEN_USER)?;
        for host in hosts {
            self.delete(&basic_user(host))?;
        }
        debug!(hosts = hosts.len(), "Credentials cleared");
        Ok(())
    }
}
