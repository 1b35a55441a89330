//! Login screen: centered credential card in the style of the web client.

use ratatui::{
    layout::Alignment,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, LoginFocus};

use super::render::centered_rect_fixed;
use super::styles;

/// Card width (interior text is padded to fit)
const CARD_WIDTH: u16 = 56;

pub fn render(frame: &mut Frame, app: &App) {
    let form = &app.login;

    let height = if form.error.is_some() { 17 } else { 15 };
    let area = centered_rect_fixed(CARD_WIDTH, height, frame.area());

    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            "Sistema de Alerta Temprana",
            styles::title_style(),
        ))
        .alignment(Alignment::Center),
        Line::from(Span::styled(
            "Unidad Educativa Juan Montalvo",
            styles::muted_style(),
        ))
        .alignment(Alignment::Center),
        Line::from(""),
        Line::from(Span::styled("Iniciar Sesión", styles::highlight_style()))
            .alignment(Alignment::Center),
        Line::from(""),
    ];

    if let Some(ref error) = form.error {
        lines.push(
            Line::from(Span::styled(error.clone(), styles::error_style()))
                .alignment(Alignment::Center),
        );
        lines.push(Line::from(""));
    }

    // Username field
    let username_focused = form.focus == LoginFocus::Username && !form.is_submitting;
    let username_style = if username_focused {
        styles::selected_style()
    } else {
        styles::field_style()
    };
    let cursor = if username_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled("Usuario:    [", styles::muted_style()),
        Span::styled(
            format!("{:<24}{}", form.username, cursor),
            username_style,
        ),
        Span::styled("]", styles::muted_style()),
    ]));

    // Password field (masked)
    let password_focused = form.focus == LoginFocus::Password && !form.is_submitting;
    let password_style = if password_focused {
        styles::selected_style()
    } else {
        styles::field_style()
    };
    let masked: String = "*".repeat(form.password.len().min(24));
    let cursor = if password_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled("Contraseña: [", styles::muted_style()),
        Span::styled(format!("{:<24}{}", masked, cursor), password_style),
        Span::styled("]", styles::muted_style()),
    ]));

    lines.push(Line::from(""));

    // Submit button, replaced by a progress label while an attempt is
    // outstanding
    if form.is_submitting {
        lines.push(
            Line::from(Span::styled(
                "Iniciando sesión...",
                styles::muted_style(),
            ))
            .alignment(Alignment::Center),
        );
    } else {
        let button_focused = form.focus == LoginFocus::Button;
        let label = if button_focused {
            " ▶ Ingresar ◀ "
        } else {
            "   Ingresar   "
        };
        let button_style = if button_focused {
            styles::selected_style()
        } else {
            styles::field_style()
        };
        lines.push(
            Line::from(vec![
                Span::raw("["),
                Span::styled(label, button_style),
                Span::raw("]"),
            ])
            .alignment(Alignment::Center),
        );
    }

    lines.push(Line::from(""));
    lines.push(
        Line::from(Span::styled(
            "Acceso restringido solo para personal autorizado",
            styles::muted_style(),
        ))
        .alignment(Alignment::Center),
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);

    render_footer(frame);
}

fn render_footer(frame: &mut Frame) {
    let area = frame.area();
    if area.height < 2 {
        return;
    }
    let footer_area = ratatui::layout::Rect::new(area.x, area.bottom() - 1, area.width, 1);
    let footer = Paragraph::new(Line::from(Span::styled(
        "© 2025 Sistema de Alerta Temprana Académica",
        styles::muted_style(),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(footer, footer_area);
}
