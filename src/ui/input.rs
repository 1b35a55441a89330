//! Keyboard input handling for the TUI.
//!
//! Input is gated exactly like rendering: while bootstrap is unresolved
//! nothing is interactive, on the login screen only the form receives keys,
//! and the protected-tree bindings exist only while authenticated.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{can_add_password_char, can_add_username_char, App, AppState, LoginFocus, View};
use crate::route::Gate;

/// Handle a keyboard event. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.gate() {
        Gate::Loading => Ok(false),
        Gate::Login => handle_login_input(app, key),
        Gate::Protected => handle_protected_input(app, key),
    }
}

fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // No edits or resubmission while an attempt is outstanding
    if app.login.is_submitting {
        return Ok(false);
    }

    match key.code {
        KeyCode::Esc => {
            // Quit from the login screen
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login.focus = match app.login.focus {
                LoginFocus::Username => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Username,
            };
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login.focus = match app.login.focus {
                LoginFocus::Username => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Username,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login.focus {
            LoginFocus::Username => {
                app.login.focus = LoginFocus::Password;
            }
            LoginFocus::Password | LoginFocus::Button => {
                // Validation failures set the form error; success is picked
                // up by the route gate, not by this handler
                app.submit_login();
            }
        },
        KeyCode::Backspace => match app.login.focus {
            LoginFocus::Username => {
                app.login.username.pop();
            }
            LoginFocus::Password => {
                app.login.password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login.focus {
            LoginFocus::Username => {
                if can_add_username_char(app.login.username.len(), c) {
                    app.login.username.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login.password.len(), c) {
                    app.login.password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }
    Ok(false)
}

fn handle_protected_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('c') => {
            app.logout();
        }
        KeyCode::Char('1') => {
            app.current_view = View::Dashboard;
        }
        KeyCode::Char('2') => {
            app.current_view = View::Institucional;
        }
        KeyCode::Char('3') => {
            app.current_view = View::Estudiante;
        }
        KeyCode::Left => {
            app.current_view = app.current_view.prev();
        }
        KeyCode::Right => {
            app.current_view = app.current_view.next();
        }
        _ => {}
    }
    Ok(false)
}
