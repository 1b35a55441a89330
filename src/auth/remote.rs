use tracing::{debug, warn};

use crate::api::{ApiClient, ApiUser};

use super::credentials::TokenStore;
use super::session::{Identity, IdentityCheck};
use super::AuthError;

impl From<ApiUser> for Identity {
    fn from(user: ApiUser) -> Self {
        Identity {
            username: user.username,
            name: user.name,
            role: user.role,
        }
    }
}

/// [`IdentityCheck`] backed by the alerta backend plus the OS keychain.
///
/// A successful login persists the issued token so the next process start
/// can recover the session without fresh credentials.
pub struct RemoteIdentity {
    api: ApiClient,
}

impl RemoteIdentity {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl IdentityCheck for RemoteIdentity {
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Identity, AuthError> {
        let response = self.api.login(username, password).await?;

        if let Some(secs) = response.expires_in {
            debug!(expires_in_secs = secs, "session token issued");
        }

        if let Err(e) = TokenStore::store(&response.token) {
            // Login still succeeds; the session just won't survive a restart
            warn!(error = %e, "failed to persist session token");
        }

        Ok(response.user.into())
    }

    async fn recover_session(&self) -> Result<Identity, AuthError> {
        let token = TokenStore::load().map_err(|_| AuthError::SessionRecovery)?;

        let response = self.api.verify(&token).await?;
        if response.valid {
            response
                .user
                .map(Identity::from)
                .ok_or(AuthError::SessionRecovery)
        } else {
            debug!("stored session token no longer valid");
            let _ = TokenStore::delete();
            Err(AuthError::SessionRecovery)
        }
    }

    async fn revoke_session(&self) {
        if let Ok(token) = TokenStore::load() {
            if let Err(e) = self.api.logout(&token).await {
                debug!(error = %e, "server-side token revocation failed");
            }
        }
        let _ = TokenStore::delete();
    }
}
