//! Routed views of the protected application tree.
//!
//! These are collaborators of the session core: each is mounted only behind
//! the route gate and may assume an authenticated session for its entire
//! mounted lifetime.

pub mod dashboard;
pub mod estudiante;
pub mod institucional;
