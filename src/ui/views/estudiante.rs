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
            "Perfil de estudiante",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Seleccione un estudiante desde el panel para ver su historial.",
            styles::muted_style(),
        )),
    ];

    let block = Block::default()
        .title(" Estudiante ")
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
