//! Route gate: the top-level decision of which screen is visible.
//!
//! A pure function of session state with no state of its own. The renderer
//! re-evaluates it on every frame from its session subscription, so the
//! protected tree is mounted strictly in sync with authentication
//! transitions and never shown while bootstrap is unresolved.

use crate::auth::Session;

/// The three renderable outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Bootstrap in flight - show the loading indicator
    Loading,
    /// No session - show the login screen
    Login,
    /// Authenticated - show the protected application tree
    Protected,
}

pub fn decide(session: &Session) -> Gate {
    if session.is_loading() {
        Gate::Loading
    } else if session.is_authenticated() {
        Gate::Protected
    } else {
        Gate::Login
    }
}
