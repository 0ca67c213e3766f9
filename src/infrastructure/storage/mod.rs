//! Credential storage adapters.

mod keyring_store;

pub use keyring_store::KeyringCredentialStore;
