//! Media fetch error types.

use thiserror::Error;

/// Message used when the transport fails without any detail.
pub const UNKNOWN_TRANSFER_FAILURE: &str = "unknown transfer failure";

/// Coarse classification of a [`MediaError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaErrorKind {
    /// Credentials missing or rejected.
    Authentication,
    /// Network or transport failure.
    Transfer,
    /// Payload is not valid media.
    Decode,
    /// Video lookup produced no usable URL.
    Resolution,
}

/// Failure delivered through a fetch's failure channel.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum MediaError {
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    #[error("transfer failed: {message}")]
    Transfer {
        message: String,
        status: Option<u16>,
    },

    #[error("failed to decode media: {message}")]
    Decode { message: String },

    #[error("failed to resolve video source: {message}")]
    Resolution { message: String },
}

impl MediaError {
    /// Creates authentication error.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates transfer error.
    #[must_use]
    pub fn transfer(message: impl Into<String>) -> Self {
        Self::Transfer {
            message: message.into(),
            status: None,
        }
    }

    /// Creates transfer error for an HTTP status.
    #[must_use]
    pub fn http_status(status: u16, reason: Option<&str>) -> Self {
        Self::Transfer {
            message: format!("HTTP {status}: {}", reason.unwrap_or("Unknown")),
            status: Some(status),
        }
    }

    /// Transfer error used when the provider reports nothing.
    #[must_use]
    pub fn unknown_transfer() -> Self {
        Self::transfer(UNKNOWN_TRANSFER_FAILURE)
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates resolution error.
    #[must_use]
    pub fn resolution(message: impl Into<String>) -> Self {
        Self::Resolution {
            message: message.into(),
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> MediaErrorKind {
        match self {
            Self::Authentication { .. } => MediaErrorKind::Authentication,
            Self::Transfer { .. } => MediaErrorKind::Transfer,
            Self::Decode { .. } => MediaErrorKind::Decode,
            Self::Resolution { .. } => MediaErrorKind::Resolution,
        }
    }

    /// Returns whether error is network related.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Transfer { .. })
    }

    /// Returns the HTTP status, if the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Transfer { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MediaError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::transfer("request timed out")
        } else if e.is_connect() {
            Self::transfer(format!("failed to connect: {e}"))
        } else if let Some(status) = e.status() {
            Self::http_status(status.as_u16(), status.canonical_reason())
        } else {
            Self::transfer(e.to_string())
        }
    }
}

impl From<super::CredentialError> for MediaError {
    fn from(e: super::CredentialError) -> Self {
        Self::authentication(e.to_string())
    }
}
