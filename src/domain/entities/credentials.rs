//! Credential value objects with masked output.

use std::fmt;

use zeroize::Zeroizing;

fn mask(value: &str) -> String {
    if value.len() <= 10 {
        return "*".repeat(value.len());
    }

    let visible_prefix = &value[..4];
    let visible_suffix = &value[value.len() - 4..];
    format!("{visible_prefix}...{visible_suffix}")
}

/// Bearer token for private managed-platform content.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: Zeroizing<String>,
}

impl AccessToken {
    /// Creates a token, rejecting blank input.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into().trim().to_string();

        if value.is_empty() || value.contains(char::is_whitespace) {
            return None;
        }

        Some(Self {
            value: Zeroizing::new(value),
        })
    }

    /// Returns token as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns masked token for display.
    #[must_use]
    pub fn masked(&self) -> String {
        mask(&self.value)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &self.masked())
            .finish()
    }
}

/// Username and password for a self-hosted site behind basic auth.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuthCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl BasicAuthCredentials {
    /// Creates credentials. The username must not contain `:`.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Option<Self> {
        let username = username.into();
        if username.is_empty() || username.contains(':') {
            return None;
        }

        Some(Self {
            username,
            password: Zeroizing::new(password.into()),
        })
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Serializes as `username:password` for keyring storage.
    #[must_use]
    pub fn to_secret(&self) -> Zeroizing<String> {
        Zeroizing::new(format!("{}:{}", self.username, self.password.as_str()))
    }

    /// Parses the `username:password` keyring form.
    #[must_use]
    pub fn from_secret(secret: &str) -> Option<Self> {
        let (username, password) = secret.split_once(':')?;
        Self::new(username, password)
    }
}

impl fmt::Debug for BasicAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_token_rejected() {
        assert!(AccessToken::new("   ").is_none());
        assert!(AccessToken::new("has space").is_none());
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let token = AccessToken::new("abcdefghijklmnopqrstuvwxyz").unwrap();
        let debug_output = format!("{token:?}");

        assert!(!debug_output.contains("abcdefghijklmnopqrstuvwxyz"));
        assert!(debug_output.contains("abcd...wxyz"));
    }

    #[test]
    fn test_secret_form_round_trips_password_with_colon() {
        let creds = BasicAuthCredentials::new("editor", "pa:ss").unwrap();
        let parsed = BasicAuthCredentials::from_secret(&creds.to_secret()).unwrap();

        assert_eq!(parsed.username(), "editor");
        assert_eq!(parsed.password(), "pa:ss");
    }

    #[test]
    fn test_debug_does_not_leak_password() {
        let creds = BasicAuthCredentials::new("editor", "hunter2").unwrap();
        assert!(!format!("{creds:?}").contains("hunter2"));
    }
}
