use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::QuestionKind;

const TRUE_FALSE_LABELS: [&str; 2] = ["True", "False"];

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(question) = app.session().current_question() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(4),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_progress(frame, chunks[0], app, question.kind.label());
    render_question_text(frame, chunks[2], &question.text);

    match &question.kind {
        QuestionKind::MultipleChoice { options } => {
            let labels: Vec<&str> = options.iter().map(|choice| choice.text.as_str()).collect();
            render_options(frame, chunks[3], &labels, app.selected_option());
            render_controls(frame, chunks[4], "j/k navigate  ·  enter select  ·  q quit");
        }
        QuestionKind::TrueFalse { .. } => {
            render_options(frame, chunks[3], &TRUE_FALSE_LABELS, app.selected_option());
            render_controls(frame, chunks[4], "j/k navigate  ·  enter select  ·  q quit");
        }
        QuestionKind::FillBlank { .. } => {
            render_input(frame, chunks[3], "Your answer", app.answer_input(), None);
            render_controls(frame, chunks[4], "enter submit  ·  esc quit");
        }
        QuestionKind::OutputBased { expected } => {
            let reveal = app.is_revealed().then_some(expected.as_str());
            render_input(frame, chunks[3], "Your output", app.answer_input(), reveal);
            let controls = if app.is_revealed() {
                "y I got it right  ·  n I got it wrong  ·  esc quit"
            } else {
                "enter submit  ·  esc quit"
            };
            render_controls(frame, chunks[4], controls);
        }
    }
}

fn render_progress(frame: &mut Frame, area: Rect, app: &App, kind: &str) {
    let progress = Line::from(vec![
        Span::styled(kind.to_string(), Style::default().fg(Color::Magenta)),
        Span::styled(
            format!(
                "   Score: {}   {}/{}",
                app.session().score(),
                app.current_question_number(),
                app.session().total_questions()
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(progress).alignment(Alignment::Right), area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, options: &[&str], selected: usize) {
    let mut lines: Vec<Line> = Vec::with_capacity(options.len() * 2);

    for (index, option) in options.iter().enumerate() {
        let is_selected = index == selected;
        let style = if is_selected {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_selected { ">" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", option_label(index)), style),
            Span::styled(*option, style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

fn option_label(index: usize) -> char {
    char::from(b'A' + (index % 26) as u8)
}

fn render_input(frame: &mut Frame, area: Rect, title: &str, input: &str, expected: Option<&str>) {
    let mut lines = vec![Line::from(vec![
        Span::styled(input, Style::default().fg(Color::Yellow)),
        Span::styled(
            if expected.is_some() { "" } else { "_" },
            Style::default().fg(Color::Yellow),
        ),
    ])];

    if let Some(expected) = expected {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Expected output:",
            Style::default().fg(Color::Green).bold(),
        )));
        lines.extend(
            expected
                .lines()
                .map(|line| Line::from(Span::styled(line, Style::default().fg(Color::Green)))),
        );
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, controls: &str) {
    let widget = Paragraph::new(controls.to_string())
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
