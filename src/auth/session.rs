//! Session state machine for the alerta client.
//!
//! The [`SessionManager`] is the single source of truth for "is this user
//! allowed to see protected content". It owns the [`Session`] record,
//! drives the bootstrap/login/logout lifecycle against a remote
//! [`IdentityCheck`], and publishes every committed transition through a
//! watch channel so the renderer can react without polling the manager's
//! internals.
//!
//! Out-of-order completions are handled with an operation sequence number:
//! each state-affecting operation takes a fresh sequence at submission time,
//! and a resolution is only applied if no later operation has begun since.
//! A resolution that lost the race is discarded ("stale-response
//! suppression") - observable state never regresses to an earlier call's
//! outcome.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::AuthError;

/// Where the session currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// Bootstrap has not resolved yet
    Unknown,
    Authenticated,
    Unauthenticated,
}

/// Who the authenticated user is, as reported by the identity service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub name: String,
    pub role: String,
}

/// The authoritative record of whether, and as whom, the user is
/// authenticated.
///
/// Invariant: `identity` is present if and only if
/// `status == AuthStatus::Authenticated`.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub status: AuthStatus,
    pub identity: Option<Identity>,
    /// Set after a failed login attempt, cleared when the next one begins
    pub last_error: Option<AuthError>,
}

impl Session {
    fn unknown() -> Self {
        Self {
            status: AuthStatus::Unknown,
            identity: None,
            last_error: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.status == AuthStatus::Unknown
    }
}

/// One login submission. Ephemeral - lives for the duration of a single
/// asynchronous login call and is discarded after resolution.
///
/// Deliberately no Debug/Serialize: the password must never reach a log
/// line or disk.
pub struct LoginAttempt {
    pub username: String,
    pub password: String,
    pub submitted_at: DateTime<Utc>,
}

impl LoginAttempt {
    pub fn new(username: String, password: String) -> Self {
        Self {
            username,
            password,
            submitted_at: Utc::now(),
        }
    }
}

/// Outcome of one login attempt, consumed once by the login form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResult {
    pub success: bool,
    /// Localized, user-facing message when `!success`
    pub error: Option<String>,
}

/// Remote identity boundary: credential verification plus recovery and
/// revocation of a previously established session.
///
/// Both calls are opaque, potentially failing, asynchronous dependencies;
/// implementations map transport faults into [`AuthError`] rather than
/// panicking or returning raw errors.
#[allow(async_fn_in_trait)]
pub trait IdentityCheck {
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Identity, AuthError>;

    async fn recover_session(&self) -> Result<Identity, AuthError>;

    /// Best-effort teardown of the remote session. Logout never waits on it.
    async fn revoke_session(&self) {}
}

struct SessionState {
    session: Session,
    /// Monotonically increasing operation sequence. Stamped at submission,
    /// compared at resolution.
    op_seq: u64,
}

/// Owner and sole mutator of the [`Session`].
///
/// All other components hold read access (via [`SessionManager::subscribe`]
/// or [`SessionManager::snapshot`]) plus the ability to invoke these
/// operations; nothing else writes the session.
pub struct SessionManager<C> {
    check: C,
    state: Mutex<SessionState>,
    changes: watch::Sender<Session>,
}

impl<C: IdentityCheck> SessionManager<C> {
    pub fn new(check: C) -> Self {
        let session = Session::unknown();
        let (changes, _) = watch::channel(session.clone());
        Self {
            check,
            state: Mutex::new(SessionState { session, op_seq: 0 }),
            changes,
        }
    }

    /// Subscribe to session transitions. Every committed state change is
    /// published; receivers see at least the latest value.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.changes.subscribe()
    }

    /// Current session, cloned
    pub fn snapshot(&self) -> Session {
        self.state.lock().session.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.lock().session.is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().session.is_loading()
    }

    /// Attempt to recover a prior session. Invoked once at process start.
    ///
    /// Publishes `Unknown` immediately, then resolves to `Authenticated` or
    /// `Unauthenticated`. Recovery failures of any kind (no stored token,
    /// expired token, unreachable server) resolve to `Unauthenticated` with
    /// no user-visible error.
    pub async fn bootstrap(&self) {
        let seq = {
            let mut st = self.state.lock();
            st.op_seq += 1;
            st.session = Session::unknown();
            self.changes.send_replace(st.session.clone());
            st.op_seq
        };

        debug!("session bootstrap started");

        match self.check.recover_session().await {
            Ok(identity) => {
                let username = identity.username.clone();
                if self.commit(seq, |s| {
                    s.status = AuthStatus::Authenticated;
                    s.identity = Some(identity);
                    s.last_error = None;
                }) {
                    info!(user = %username, "prior session recovered");
                } else {
                    debug!("stale bootstrap resolution discarded");
                }
            }
            Err(err) => {
                match err {
                    AuthError::SessionRecovery => debug!("no valid prior session"),
                    _ => warn!(error = %err, "session recovery failed"),
                }
                if !self.commit(seq, |s| {
                    s.status = AuthStatus::Unauthenticated;
                    s.identity = None;
                    s.last_error = None;
                }) {
                    debug!("stale bootstrap resolution discarded");
                }
            }
        }
    }

    /// Verify a username/password pair against the identity service.
    ///
    /// Always resolves to a [`LoginResult`]; remote faults are converted
    /// into failed results, never propagated. The caller is expected to
    /// keep at most one call outstanding, but a rapid duplicate is safe:
    /// the resolution of a superseded call is discarded.
    pub async fn login(&self, username: &str, password: &str) -> LoginResult {
        let seq = {
            let mut st = self.state.lock();
            st.op_seq += 1;
            // Cleared at the start of each attempt, before resolution
            st.session.last_error = None;
            self.changes.send_replace(st.session.clone());
            st.op_seq
        };

        match self.check.verify_credentials(username, password).await {
            Ok(identity) => {
                let username = identity.username.clone();
                if self.commit(seq, |s| {
                    s.status = AuthStatus::Authenticated;
                    s.identity = Some(identity);
                    s.last_error = None;
                }) {
                    info!(user = %username, "login succeeded");
                } else {
                    debug!("stale login resolution discarded");
                }
                LoginResult {
                    success: true,
                    error: None,
                }
            }
            Err(err) => {
                // Transport failures are logged distinctly from rejections,
                // but surface to the user the same way
                match err {
                    AuthError::Transport(_) => warn!(error = %err, "login transport failure"),
                    _ => info!(error = %err, "login rejected"),
                }
                let message = err.user_message().to_string();
                if !self.commit(seq, |s| {
                    s.status = AuthStatus::Unauthenticated;
                    s.identity = None;
                    s.last_error = Some(err);
                }) {
                    debug!("stale login resolution discarded");
                }
                LoginResult {
                    success: false,
                    error: Some(message),
                }
            }
        }
    }

    /// Close the session. Synchronous, unconditional, idempotent.
    ///
    /// Also bumps the operation sequence so any in-flight login/bootstrap
    /// resolution arriving afterwards is discarded.
    pub fn logout(&self) {
        let mut st = self.state.lock();
        st.op_seq += 1;
        st.session = Session {
            status: AuthStatus::Unauthenticated,
            identity: None,
            last_error: None,
        };
        self.changes.send_replace(st.session.clone());
        info!("session closed");
    }

    /// Best-effort remote teardown, run after [`SessionManager::logout`].
    /// Has no effect on local state.
    pub async fn revoke(&self) {
        self.check.revoke_session().await;
    }

    /// Apply a transition if no later operation has begun since `seq`.
    /// Returns whether the transition was committed.
    fn commit(&self, seq: u64, apply: impl FnOnce(&mut Session)) -> bool {
        let mut st = self.state.lock();
        if st.op_seq != seq {
            return false;
        }
        apply(&mut st.session);
        self.changes.send_replace(st.session.clone());
        true
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use tokio::sync::oneshot;

    fn ident(username: &str) -> Identity {
        Identity {
            username: username.to_string(),
            name: "DECE Juan Montalvo".to_string(),
            role: "admin".to_string(),
        }
    }

    /// Scripted outcome for one remote call
    enum Outcome {
        Ready(Result<Identity, AuthError>),
        Wait(oneshot::Receiver<Result<Identity, AuthError>>),
    }

    /// Fake identity service with scripted, optionally deferred outcomes
    struct ScriptedCheck {
        logins: Mutex<VecDeque<Outcome>>,
        recoveries: Mutex<VecDeque<Outcome>>,
    }

    impl ScriptedCheck {
        fn new() -> Self {
            Self {
                logins: Mutex::new(VecDeque::new()),
                recoveries: Mutex::new(VecDeque::new()),
            }
        }

        fn login_outcome(self, outcome: Outcome) -> Self {
            self.logins.lock().push_back(outcome);
            self
        }

        fn recovery_outcome(self, outcome: Outcome) -> Self {
            self.recoveries.lock().push_back(outcome);
            self
        }

        async fn next(queue: &Mutex<VecDeque<Outcome>>) -> Result<Identity, AuthError> {
            let outcome = queue.lock().pop_front().expect("script exhausted");
            match outcome {
                Outcome::Ready(result) => result,
                Outcome::Wait(rx) => rx.await.expect("script sender dropped"),
            }
        }
    }

    impl IdentityCheck for ScriptedCheck {
        async fn verify_credentials(
            &self,
            _username: &str,
            _password: &str,
        ) -> Result<Identity, AuthError> {
            Self::next(&self.logins).await
        }

        async fn recover_session(&self) -> Result<Identity, AuthError> {
            Self::next(&self.recoveries).await
        }
    }

    fn assert_identity_invariant(session: &Session) {
        assert_eq!(
            session.identity.is_some(),
            session.status == AuthStatus::Authenticated
        );
    }

    #[tokio::test]
    async fn test_login_success_authenticates() {
        let check = ScriptedCheck::new().login_outcome(Outcome::Ready(Ok(ident("admin"))));
        let mgr = SessionManager::new(check);
        mgr.logout();

        let result = mgr.login("admin", "correct").await;

        assert!(result.success);
        assert!(result.error.is_none());
        let session = mgr.snapshot();
        assert_eq!(session.status, AuthStatus::Authenticated);
        assert_eq!(session.identity.as_ref().unwrap().username, "admin");
        assert!(session.last_error.is_none());
        assert_identity_invariant(&session);
        assert!(mgr.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_failure_stays_unauthenticated() {
        let check =
            ScriptedCheck::new().login_outcome(Outcome::Ready(Err(AuthError::InvalidCredentials)));
        let mgr = SessionManager::new(check);
        mgr.logout();

        let result = mgr.login("admin", "wrong").await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Credenciales inválidas"));
        let session = mgr.snapshot();
        assert_eq!(session.status, AuthStatus::Unauthenticated);
        assert!(session.identity.is_none());
        assert_eq!(session.last_error, Some(AuthError::InvalidCredentials));
        assert_identity_invariant(&session);
    }

    #[tokio::test]
    async fn test_login_transport_failure_yields_result_not_fault() {
        let check = ScriptedCheck::new().login_outcome(Outcome::Ready(Err(AuthError::Transport(
            "connection refused".to_string(),
        ))));
        let mgr = SessionManager::new(check);
        mgr.logout();

        let result = mgr.login("admin", "correct").await;

        assert!(!result.success);
        assert!(result.error.is_some());
        assert!(matches!(
            mgr.snapshot().last_error,
            Some(AuthError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_login_clears_previous_error_before_resolution() {
        let (tx, rx) = oneshot::channel();
        let check = ScriptedCheck::new()
            .login_outcome(Outcome::Ready(Err(AuthError::InvalidCredentials)))
            .login_outcome(Outcome::Wait(rx));
        let mgr = SessionManager::new(check);
        mgr.logout();

        let _ = mgr.login("admin", "wrong").await;
        assert!(mgr.snapshot().last_error.is_some());

        // The error clears when the next attempt begins, not when it resolves
        tokio::join!(mgr.login("admin", "correct"), async {
            assert!(mgr.snapshot().last_error.is_none());
            tx.send(Ok(ident("admin"))).unwrap();
        });

        assert!(mgr.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_from_unknown_and_idempotence() {
        let mgr = SessionManager::new(ScriptedCheck::new());
        assert!(mgr.is_loading());

        mgr.logout();
        let once = mgr.snapshot();
        assert_eq!(once.status, AuthStatus::Unauthenticated);
        assert!(once.identity.is_none());
        assert!(once.last_error.is_none());

        mgr.logout();
        assert_eq!(mgr.snapshot(), once);
    }

    #[tokio::test]
    async fn test_logout_clears_authenticated_session() {
        let check = ScriptedCheck::new().login_outcome(Outcome::Ready(Ok(ident("admin"))));
        let mgr = SessionManager::new(check);
        mgr.logout();
        let _ = mgr.login("admin", "correct").await;
        assert!(mgr.is_authenticated());

        mgr.logout();

        let session = mgr.snapshot();
        assert_eq!(session.status, AuthStatus::Unauthenticated);
        assert!(session.identity.is_none());
        assert_identity_invariant(&session);
    }

    #[tokio::test]
    async fn test_bootstrap_with_valid_prior_session() {
        let check = ScriptedCheck::new().recovery_outcome(Outcome::Ready(Ok(ident("x"))));
        let mgr = SessionManager::new(check);
        assert!(mgr.is_loading());

        mgr.bootstrap().await;

        let session = mgr.snapshot();
        assert_eq!(session.status, AuthStatus::Authenticated);
        assert_eq!(session.identity.as_ref().unwrap().username, "x");
        assert!(session.last_error.is_none());
        assert!(!mgr.is_loading());
    }

    #[tokio::test]
    async fn test_bootstrap_without_prior_session_is_silent() {
        let check =
            ScriptedCheck::new().recovery_outcome(Outcome::Ready(Err(AuthError::SessionRecovery)));
        let mgr = SessionManager::new(check);

        mgr.bootstrap().await;

        let session = mgr.snapshot();
        assert_eq!(session.status, AuthStatus::Unauthenticated);
        assert!(session.identity.is_none());
        // Recovery failure never surfaces an error to the user
        assert!(session.last_error.is_none());
    }

    #[tokio::test]
    async fn test_bootstrap_transport_failure_resolves_unauthenticated() {
        let check = ScriptedCheck::new().recovery_outcome(Outcome::Ready(Err(
            AuthError::Transport("timeout".to_string()),
        )));
        let mgr = SessionManager::new(check);

        mgr.bootstrap().await;

        let session = mgr.snapshot();
        assert_eq!(session.status, AuthStatus::Unauthenticated);
        assert!(session.last_error.is_none());
    }

    #[tokio::test]
    async fn test_stale_login_does_not_overwrite_later_login() {
        // login(A) is issued first but resolves after login(B); the final
        // identity must reflect B
        let (tx_a, rx_a) = oneshot::channel();
        let check = ScriptedCheck::new()
            .login_outcome(Outcome::Wait(rx_a))
            .login_outcome(Outcome::Ready(Ok(ident("b"))));
        let mgr = SessionManager::new(check);
        mgr.logout();

        let (result_a, result_b) = tokio::join!(mgr.login("a", "pa"), async {
            let result = mgr.login("b", "pb").await;
            tx_a.send(Ok(ident("a"))).unwrap();
            result
        });

        assert!(result_b.success);
        // A's own resolution is reported to its caller but not applied
        assert!(result_a.success);
        assert_eq!(mgr.snapshot().identity.unwrap().username, "b");
    }

    #[tokio::test]
    async fn test_logout_discards_inflight_login() {
        let (tx, rx) = oneshot::channel();
        let check = ScriptedCheck::new().login_outcome(Outcome::Wait(rx));
        let mgr = SessionManager::new(check);
        mgr.logout();

        let (_, ()) = tokio::join!(mgr.login("admin", "correct"), async {
            mgr.logout();
            tx.send(Ok(ident("admin"))).unwrap();
        });

        let session = mgr.snapshot();
        assert_eq!(session.status, AuthStatus::Unauthenticated);
        assert!(session.identity.is_none());
    }

    #[tokio::test]
    async fn test_second_bootstrap_wins_over_first() {
        let (tx1, rx1) = oneshot::channel();
        let check = ScriptedCheck::new()
            .recovery_outcome(Outcome::Wait(rx1))
            .recovery_outcome(Outcome::Ready(Ok(ident("new"))));
        let mgr = SessionManager::new(check);

        tokio::join!(mgr.bootstrap(), async {
            mgr.bootstrap().await;
            tx1.send(Ok(ident("old"))).unwrap();
        });

        assert_eq!(mgr.snapshot().identity.unwrap().username, "new");
    }

    #[tokio::test]
    async fn test_subscription_observes_transitions() {
        let check = ScriptedCheck::new().login_outcome(Outcome::Ready(Ok(ident("admin"))));
        let mgr = SessionManager::new(check);
        let mut rx = mgr.subscribe();

        assert_eq!(rx.borrow_and_update().status, AuthStatus::Unknown);

        mgr.logout();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().status, AuthStatus::Unauthenticated);

        let _ = mgr.login("admin", "correct").await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().status, AuthStatus::Authenticated);
    }
}
