//! Authentication module: session state machine, error taxonomy, and
//! credential persistence.
//!
//! This module provides:
//! - `SessionManager`: the single source of truth for authentication state
//! - `AuthError`: failure taxonomy with localized user-facing messages
//! - `TokenStore`: opaque session-token storage via the OS keychain
//! - `RemoteIdentity`: the backend-facing `IdentityCheck` implementation

pub mod credentials;
pub mod error;
pub mod remote;
pub mod session;

pub use credentials::TokenStore;
pub use error::AuthError;
pub use remote::RemoteIdentity;
pub use session::{
    AuthStatus, Identity, IdentityCheck, LoginAttempt, LoginResult, Session, SessionManager,
};
