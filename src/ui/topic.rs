use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(11),
        Constraint::Fill(1),
    ])
    .split(area);

    let mut content = vec![
        Line::from(""),
        super::title_line(),
        Line::from(""),
        Line::from("AI generated practice questions".fg(Color::DarkGray)),
        Line::from(""),
        Line::from(vec![
            Span::styled("Topic: ", Style::default().fg(Color::White)),
            Span::styled(app.topic_input(), Style::default().fg(Color::Yellow)),
            Span::styled("_", Style::default().fg(Color::Yellow)),
        ]),
        Line::from(""),
    ];

    match app.notice() {
        Some(notice) => content.push(Line::from(Span::styled(
            notice,
            Style::default().fg(Color::Red),
        ))),
        None => content.push(Line::from("")),
    }

    content.push(Line::from(Span::styled(
        "ENTER start practice  ·  ESC quit",
        Style::default().fg(Color::Green),
    )));

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );

    frame.render_widget(widget, chunks[1]);
}
