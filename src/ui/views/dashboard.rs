use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let session = app.current_session();
    let greeting = session
        .identity
        .map(|i| format!("Bienvenido, {}", if i.name.is_empty() { i.username } else { i.name }))
        .unwrap_or_default();

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(greeting, styles::highlight_style())),
        Line::from(""),
        Line::from(Span::styled(
            "Panel de alerta temprana académica.",
            styles::help_desc_style(),
        )),
        Line::from(Span::styled(
            "Los indicadores de riesgo se cargan desde el servidor institucional.",
            styles::muted_style(),
        )),
    ];

    let block = Block::default()
        .title(" Panel ")
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
