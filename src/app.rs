//! Application state management for the alerta client.
//!
//! `App` wires the session manager to the terminal UI: it holds the login
//! form state, the protected-tree navigation state, and the channel through
//! which background login tasks report back to the event loop.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{error, warn};

use crate::auth::{LoginAttempt, LoginResult, RemoteIdentity, Session, SessionManager};
use crate::config::Config;
use crate::route::{decide, Gate};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the auth event channel.
/// One login attempt is outstanding at a time, so a small buffer suffices.
const CHANNEL_BUFFER_SIZE: usize = 8;

/// Maximum length for username input
const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Shown when the form is submitted with an empty field
const REQUIRED_FIELDS_MESSAGE: &str = "Usuario y contraseña requeridos";

// ============================================================================
// UI State Types
// ============================================================================

/// Routed views inside the protected tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Institucional,
    Estudiante,
}

impl View {
    /// Get the display title for this view
    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Panel",
            View::Institucional => "Institucional",
            View::Estudiante => "Estudiante",
        }
    }

    /// Get the next view (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            View::Dashboard => View::Institucional,
            View::Institucional => View::Estudiante,
            View::Estudiante => View::Dashboard,
        }
    }

    /// Get the previous view (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            View::Dashboard => View::Estudiante,
            View::Institucional => View::Dashboard,
            View::Estudiante => View::Institucional,
        }
    }
}

/// Overall application state (overlays on top of the route gate)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Username,
    Password,
    Button,
}

// ============================================================================
// Credential Submitter
// ============================================================================

/// Login form state: two required fields, an inline error display, and a
/// submission latch that prevents a second attempt while one is outstanding.
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: LoginFocus,
    pub error: Option<String>,
    pub is_submitting: bool,
}

impl LoginForm {
    pub fn new(prefill_username: Option<String>) -> Self {
        let username = prefill_username.unwrap_or_default();
        let focus = if username.is_empty() {
            LoginFocus::Username
        } else {
            LoginFocus::Password
        };
        Self {
            username,
            password: String::new(),
            focus,
            error: None,
            is_submitting: false,
        }
    }

    /// Validate the fields and, if the form may be submitted, latch
    /// `is_submitting` and hand back the attempt to run.
    ///
    /// The error display clears as soon as a new attempt begins, before the
    /// asynchronous call resolves.
    pub fn begin_submit(&mut self) -> Option<LoginAttempt> {
        if self.is_submitting {
            return None;
        }

        if self.username.trim().is_empty() || self.password.is_empty() {
            self.error = Some(REQUIRED_FIELDS_MESSAGE.to_string());
            return None;
        }

        self.error = None;
        self.is_submitting = true;
        Some(LoginAttempt::new(
            self.username.trim().to_string(),
            self.password.clone(),
        ))
    }

    /// Consume the result of the attempt started by `begin_submit`.
    /// Resets `is_submitting` exactly once per attempt, success or failure.
    pub fn finish_submit(&mut self, result: &LoginResult) {
        self.is_submitting = false;
        if result.success {
            self.password.clear();
        } else {
            self.error = result.error.clone();
        }
    }
}

// ============================================================================
// Background Auth Events
// ============================================================================

/// Results sent from spawned auth tasks back to the event loop
pub enum AuthEvent {
    /// A login attempt resolved
    LoginDone(LoginResult),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    pub config: Config,
    pub session: Arc<SessionManager<RemoteIdentity>>,
    /// The renderer's subscription to session transitions; session state is
    /// only ever read through this
    session_rx: watch::Receiver<Session>,

    pub state: AppState,
    pub current_view: View,
    pub login: LoginForm,
    pub status_message: Option<String>,

    auth_rx: mpsc::Receiver<AuthEvent>,
    auth_tx: mpsc::Sender<AuthEvent>,
}

impl App {
    pub fn new(config: Config, session: Arc<SessionManager<RemoteIdentity>>) -> Self {
        let session_rx = session.subscribe();
        let (auth_tx, auth_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let prefill = std::env::var("ALERTA_USERNAME")
            .ok()
            .or_else(|| config.last_username.clone());

        Self {
            config,
            session,
            session_rx,
            state: AppState::Normal,
            current_view: View::Dashboard,
            login: LoginForm::new(prefill),
            status_message: None,
            auth_rx,
            auth_tx,
        }
    }

    /// Which top-level screen is visible, re-evaluated from the session
    /// subscription
    pub fn gate(&self) -> Gate {
        decide(&self.session_rx.borrow())
    }

    /// Current session, for display (identity in the title bar)
    pub fn current_session(&self) -> Session {
        self.session_rx.borrow().clone()
    }

    /// Run the login attempt currently in the form, if it validates.
    /// The resolution comes back through the auth event channel.
    pub fn submit_login(&mut self) {
        let Some(attempt) = self.login.begin_submit() else {
            return;
        };

        let session = Arc::clone(&self.session);
        let tx = self.auth_tx.clone();
        tokio::spawn(async move {
            let result = session.login(&attempt.username, &attempt.password).await;
            if let Err(e) = tx.send(AuthEvent::LoginDone(result)).await {
                error!(error = %e, "Failed to send login result - channel closed");
            }
        });
    }

    /// Close the session. The gate unmounts the protected tree on the next
    /// frame; remote token revocation happens in the background.
    pub fn logout(&mut self) {
        self.session.logout();
        self.current_view = View::Dashboard;
        self.status_message = None;

        let session = Arc::clone(&self.session);
        tokio::spawn(async move {
            session.revoke().await;
        });
    }

    /// Drain completed background auth tasks
    pub fn drain_auth_events(&mut self) {
        while let Ok(event) = self.auth_rx.try_recv() {
            match event {
                AuthEvent::LoginDone(result) => {
                    if result.success {
                        self.config.last_username = Some(self.login.username.trim().to_string());
                        if let Err(e) = self.config.save() {
                            warn!(error = %e, "Failed to save config");
                        }
                    }
                    self.login.finish_submit(&result);
                }
            }
        }
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a username character should be accepted
pub fn can_add_username_char(current_len: usize, c: char) -> bool {
    current_len < MAX_USERNAME_LENGTH && is_valid_input_char(c)
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // LoginForm Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_begin_submit_requires_both_fields() {
        let mut form = LoginForm::new(None);
        assert!(form.begin_submit().is_none());
        assert_eq!(form.error.as_deref(), Some(REQUIRED_FIELDS_MESSAGE));
        assert!(!form.is_submitting);

        form.username = "admin".to_string();
        assert!(form.begin_submit().is_none());

        form.password = "secret".to_string();
        let attempt = form.begin_submit().expect("should submit");
        assert_eq!(attempt.username, "admin");
        assert_eq!(attempt.password, "secret");
        assert!(form.is_submitting);
    }

    #[test]
    fn test_begin_submit_rejects_whitespace_username() {
        let mut form = LoginForm::new(None);
        form.username = "   ".to_string();
        form.password = "secret".to_string();
        assert!(form.begin_submit().is_none());
        assert_eq!(form.error.as_deref(), Some(REQUIRED_FIELDS_MESSAGE));
    }

    #[test]
    fn test_begin_submit_clears_error_immediately() {
        let mut form = LoginForm::new(None);
        form.username = "admin".to_string();
        form.password = "secret".to_string();
        form.error = Some("Credenciales inválidas".to_string());

        // The previous error disappears when the new attempt begins,
        // before any resolution arrives
        assert!(form.begin_submit().is_some());
        assert!(form.error.is_none());
    }

    #[test]
    fn test_begin_submit_blocked_while_outstanding() {
        let mut form = LoginForm::new(None);
        form.username = "admin".to_string();
        form.password = "secret".to_string();

        assert!(form.begin_submit().is_some());
        // Resubmission is disabled until the first attempt resolves
        assert!(form.begin_submit().is_none());
        assert!(form.error.is_none());
    }

    #[test]
    fn test_finish_submit_failure_shows_error_and_releases_latch() {
        let mut form = LoginForm::new(None);
        form.username = "admin".to_string();
        form.password = "wrong".to_string();
        form.begin_submit().expect("should submit");

        form.finish_submit(&LoginResult {
            success: false,
            error: Some("Error al iniciar sesión".to_string()),
        });

        assert!(!form.is_submitting);
        assert_eq!(form.error.as_deref(), Some("Error al iniciar sesión"));
        // The form stays interactive: a new attempt may begin
        assert!(form.begin_submit().is_some());
    }

    #[test]
    fn test_finish_submit_success_clears_password() {
        let mut form = LoginForm::new(Some("admin".to_string()));
        form.password = "correct".to_string();
        form.begin_submit().expect("should submit");

        form.finish_submit(&LoginResult {
            success: true,
            error: None,
        });

        assert!(!form.is_submitting);
        assert!(form.error.is_none());
        assert!(form.password.is_empty());
    }

    #[test]
    fn test_prefilled_username_focuses_password() {
        let form = LoginForm::new(Some("admin".to_string()));
        assert_eq!(form.focus, LoginFocus::Password);

        let form = LoginForm::new(None);
        assert_eq!(form.focus, LoginFocus::Username);
    }

    // -------------------------------------------------------------------------
    // View Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_view_next() {
        assert_eq!(View::Dashboard.next(), View::Institucional);
        assert_eq!(View::Institucional.next(), View::Estudiante);
        assert_eq!(View::Estudiante.next(), View::Dashboard); // Wraps around
    }

    #[test]
    fn test_view_prev() {
        assert_eq!(View::Dashboard.prev(), View::Estudiante); // Wraps around
        assert_eq!(View::Estudiante.prev(), View::Institucional);
        assert_eq!(View::Institucional.prev(), View::Dashboard);
    }

    // -------------------------------------------------------------------------
    // Input Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_username_char() {
        assert!(can_add_username_char(0, 'a'));
        assert!(can_add_username_char(49, 'z'));
        assert!(!can_add_username_char(50, 'a'));
        assert!(!can_add_username_char(0, '\n'));
        assert!(!can_add_username_char(0, '\x00'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, 'a'));
        assert!(can_add_password_char(127, '!'));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\r'));
    }
}
