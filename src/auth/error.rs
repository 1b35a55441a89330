use thiserror::Error;

use crate::api::ApiError;

/// Failure taxonomy for authentication operations.
///
/// Display messages are diagnostic (for logs); the localized text shown to
/// the user comes from [`AuthError::user_message`], so the state machine
/// itself never carries UI strings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The remote check explicitly rejected the username/password pair.
    #[error("credentials rejected by the identity service")]
    InvalidCredentials,

    /// The remote check could not be reached or did not complete.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Bootstrap found no valid prior session. Never shown to the user.
    #[error("no valid prior session")]
    SessionRecovery,

    /// The service answered with something we could not use.
    #[error("unexpected response from identity service: {0}")]
    Remote(String),
}

impl AuthError {
    /// Localized, user-facing message for the login screen.
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "Credenciales inválidas",
            AuthError::Transport(_) => "No se pudo conectar con el servidor. Intente nuevamente.",
            AuthError::SessionRecovery | AuthError::Remote(_) => "Error al iniciar sesión",
        }
    }
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => AuthError::InvalidCredentials,
            ApiError::Network(msg) | ApiError::Timeout(msg) => AuthError::Transport(msg),
            ApiError::ServerError(msg) | ApiError::InvalidResponse(msg) => AuthError::Remote(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_message() {
        assert_eq!(
            AuthError::InvalidCredentials.user_message(),
            "Credenciales inválidas"
        );
    }

    #[test]
    fn test_transport_and_remote_messages_are_generic() {
        // Transport failures surface like any other failure, just with
        // different wording; neither leaks diagnostic detail.
        let transport = AuthError::Transport("connection refused".to_string());
        assert!(!transport.user_message().contains("connection refused"));

        let remote = AuthError::Remote("500: boom".to_string());
        assert_eq!(remote.user_message(), "Error al iniciar sesión");
    }

    #[test]
    fn test_api_error_mapping() {
        assert_eq!(
            AuthError::from(ApiError::Unauthorized),
            AuthError::InvalidCredentials
        );
        assert!(matches!(
            AuthError::from(ApiError::Network("refused".to_string())),
            AuthError::Transport(_)
        ));
        assert!(matches!(
            AuthError::from(ApiError::ServerError("500".to_string())),
            AuthError::Remote(_)
        ));
    }
}
