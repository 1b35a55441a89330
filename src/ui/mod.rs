//! Terminal UI module using ratatui.
//!
//! This module provides the TUI rendering and input handling:
//!
//! - `render`: gate-driven frame rendering and the protected shell layout
//! - `login`: the login screen (credential form)
//! - `input`: keyboard event handling
//! - `styles`: color scheme and text styling
//! - `views`: routed views inside the protected tree

pub mod input;
pub mod login;
pub mod render;
pub mod styles;
pub mod views;
