use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "alerta-tui";

/// Keyring account under which the session token is filed
const TOKEN_ACCOUNT: &str = "session-token";

/// Opaque session token storage in the OS keychain.
///
/// Only the bearer token is persisted between runs; the password itself
/// never leaves memory.
pub struct TokenStore;

impl TokenStore {
    /// Store the session token in the OS keychain
    pub fn store(token: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, TOKEN_ACCOUNT)
            .context("Failed to create keyring entry")?;
        entry
            .set_password(token)
            .context("Failed to store session token in keychain")?;
        Ok(())
    }

    /// Retrieve the stored session token, if any
    pub fn load() -> Result<String> {
        let entry = Entry::new(SERVICE_NAME, TOKEN_ACCOUNT)
            .context("Failed to create keyring entry")?;
        entry
            .get_password()
            .context("Failed to retrieve session token from keychain")
    }

    /// Delete the stored session token
    pub fn delete() -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, TOKEN_ACCOUNT)
            .context("Failed to create keyring entry")?;
        entry
            .delete_credential()
            .context("Failed to delete session token from keychain")?;
        Ok(())
    }
}
