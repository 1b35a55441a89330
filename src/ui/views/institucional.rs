use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, _app: &App, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Vista institucional",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Distribución de riesgo por curso y paralelo.",
            styles::help_desc_style(),
        )),
        Line::from(Span::styled(
            "Unidad Educativa Juan Montalvo",
            styles::muted_style(),
        )),
    ];

    let block = Block::default()
        .title(" Institucional ")
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
