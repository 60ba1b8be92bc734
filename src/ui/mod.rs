mod quiz;
mod result;
mod topic;

use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::SessionStatus;

const TITLE: &str = "CODEDRILL";

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.status() {
        SessionStatus::Idle => topic::render(frame, area, app),
        SessionStatus::Loading => render_loading(frame, area, app),
        SessionStatus::InProgress => quiz::render(frame, area, app),
        SessionStatus::Finished => result::render(frame, area, app),
        SessionStatus::Failed => render_failed(frame, area, app),
    }
}

fn title_line() -> Line<'static> {
    Line::from(Span::styled(TITLE, Style::default().fg(Color::Magenta).bold()))
}

fn render_loading(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(7),
        Constraint::Percentage(40),
    ])
    .split(area);

    let topic = app.session().topic().unwrap_or_default();
    let content = vec![
        Line::from(""),
        title_line(),
        Line::from(""),
        Line::from(Span::styled(
            format!("Generating questions on {}...", topic),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from("q quit".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, chunks[1]);
}

fn render_failed(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Percentage(30),
        Constraint::Length(10),
        Constraint::Percentage(30),
    ])
    .margin(2)
    .split(area);

    let message = app
        .session()
        .error()
        .map(|err| err.to_string())
        .unwrap_or_else(|| "Failed to fetch questions".to_string());

    let content = vec![
        Line::from(""),
        title_line(),
        Line::from(""),
        Line::from(Span::styled(
            "Failed to fetch questions. Please try again.",
            Style::default().fg(Color::Red).bold(),
        )),
        Line::from(Span::styled(message, Style::default().fg(Color::Gray))),
        Line::from(""),
        Line::from(""),
        Line::from("r retry  ·  n new topic  ·  q quit".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, chunks[1]);
}
