use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, View};
use crate::route::Gate;

use super::login;
use super::styles;
use super::views::{dashboard, estudiante, institucional};

/// Top-level frame rendering, driven by the route gate: exactly one of the
/// loading screen, the login screen, or the protected tree is mounted.
pub fn render(frame: &mut Frame, app: &App) {
    match app.gate() {
        Gate::Loading => render_loading(frame),
        Gate::Login => login::render(frame, app),
        Gate::Protected => {
            render_protected(frame, app);

            if matches!(app.state, AppState::ShowingHelp) {
                render_help_overlay(frame);
            }
            if matches!(app.state, AppState::ConfirmingQuit) {
                render_quit_overlay(frame);
            }
        }
    }
}

fn render_loading(frame: &mut Frame) {
    let area = centered_rect_fixed(30, 3, frame.area());
    let paragraph = Paragraph::new(Line::from(Span::styled(
        "Cargando...",
        styles::muted_style(),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border_style(false)),
    );
    frame.render_widget(paragraph, area);
}

fn render_protected(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Alerta Temprana";
    let help_hint = "[?] Ayuda";

    // Identity is guaranteed present behind the gate
    let session = app.current_session();
    let user = session
        .identity
        .map(|i| {
            if i.name.is_empty() {
                i.username
            } else {
                i.name
            }
        })
        .unwrap_or_default();

    let padding = (area.width as usize).saturating_sub(
        display_width(title) + display_width(&user) + display_width(help_hint) + 6,
    );

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(user, styles::highlight_style()),
        Span::raw("  "),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = [
        ("[1] Panel", app.current_view == View::Dashboard),
        ("[2] Institucional", app.current_view == View::Institucional),
        ("[3] Estudiante", app.current_view == View::Estudiante),
    ];

    let mut spans = vec![Span::raw(" ")];
    for (i, (label, selected)) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        spans.push(Span::styled(*label, styles::tab_style(*selected)));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_view {
        View::Dashboard => dashboard::render(frame, app, area),
        View::Institucional => institucional::render(frame, app, area),
        View::Estudiante => estudiante::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[c] Cerrar sesión | [q] Salir";

    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        let session = app.current_session();
        match session.identity {
            Some(identity) => format!(" Sesión: {} ({}) ", identity.username, identity.role),
            None => " ".to_string(),
        }
    };

    let right_text = format!(" {} ", shortcuts);
    let padding = (area.width as usize)
        .saturating_sub(display_width(&left_text))
        .saturating_sub(display_width(&right_text));

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(right_text, styles::muted_style()),
    ]);

    frame.render_widget(
        Paragraph::new(status_line).style(styles::status_bar_style()),
        area,
    );
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 14, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled(
            "Alerta Temprana",
            styles::title_style(),
        ))
        .alignment(Alignment::Center),
        Line::from(Span::styled(
            format!("versión {}", version),
            styles::muted_style(),
        ))
        .alignment(Alignment::Center),
        Line::from(""),
        help_line("1-3", "Cambiar de vista"),
        help_line("←/→", "Vista anterior/siguiente"),
        help_line("c", "Cerrar sesión"),
        help_line("q", "Salir"),
        help_line("?", "Mostrar/ocultar esta ayuda"),
        Line::from(""),
        Line::from(Span::styled(
            "Presione Esc para volver",
            styles::muted_style(),
        ))
        .alignment(Alignment::Center),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn help_line(key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<8}", key), styles::help_key_style()),
        Span::styled(desc.to_string(), styles::help_desc_style()),
    ])
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 5, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("  ¿Salir de la aplicación? "),
            Span::styled("[s]", styles::help_key_style()),
            Span::raw("í / "),
            Span::styled("[n]", styles::help_key_style()),
            Span::raw("o"),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub(crate) fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

/// On-screen width of a string. Byte length over-counts accented Spanish
/// text ("Sesión", display names) and skews the padding math.
fn display_width(s: &str) -> usize {
    s.chars().count()
}
