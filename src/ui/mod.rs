mod detail;
mod list;
mod popup;
pub mod text;

pub use detail::max_scroll as detail_max_scroll;

use chrono::Utc;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, Mode, View};
use crate::filter::TABS;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);

    match app.mode.view() {
        View::List => list::render(frame, app, chunks[2]),
        View::Detail => detail::render(frame, app, chunks[2]),
    }

    match &app.mode {
        Mode::Compose(compose) => popup::render_compose(frame, compose),
        Mode::Confirm(confirm) => popup::render_confirm(frame, confirm),
        Mode::List | Mode::Detail => {}
    }

    render_help(frame, app, chunks[3]);
    render_status_bar(frame, app, chunks[4]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let header = Paragraph::new(Line::from(vec![Span::styled(
        text::header_title(&app.current_filter().name),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )]))
    .style(Style::default().bg(Color::DarkGray));

    frame.render_widget(header, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();
    for (i, tab) in TABS.iter().enumerate() {
        let style = if i == app.tab_index {
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", tab.name), style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();
    for (key, desc) in text::help_entries(&app.mode) {
        spans.push(Span::styled(
            *key,
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(*desc, Style::default().fg(Color::Gray)));
        spans.push(Span::raw("  "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = text::status_line(app, Utc::now());

    let mut spans = Vec::new();
    if let Some(spinner) = status.spinner {
        spans.push(Span::styled(
            format!("{} ", spinner),
            Style::default().fg(Color::Yellow),
        ));
    }
    let style = if status.is_error {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    spans.push(Span::styled(status.text, style));

    let status_bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}
