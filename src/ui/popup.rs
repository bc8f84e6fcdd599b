use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{Compose, Confirm};

use super::text;

/// Render a centered confirmation popup: [y]es / [n]o
pub fn render_confirm(frame: &mut Frame, confirm: &Confirm) {
    let area = centered_rect(50, 8, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            text::confirm_prompt(confirm.target_state, confirm.target.kind),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            text::item_target(&confirm.target),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y]", Style::default().fg(Color::Green)),
            Span::raw("es  "),
            Span::styled("[n]", Style::default().fg(Color::Red)),
            Span::raw("o"),
        ]),
    ];

    let popup = Paragraph::new(lines)
        .block(
            Block::default().borders(Borders::ALL).title(Span::styled(
                " Confirm ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
        )
        .alignment(ratatui::layout::Alignment::Center);

    frame.render_widget(popup, area);
}

/// Render the comment editor over the current view.
pub fn render_compose(frame: &mut Frame, compose: &Compose) {
    let outer = frame.area();
    let area = centered_rect(
        outer.width.saturating_sub(8).max(40),
        outer.height.saturating_sub(6).max(10),
        outer,
    );
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            text::item_target(&compose.target),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(""),
    ];
    let mut body: Vec<Line> = compose.buffer.split('\n').map(Line::raw).collect();
    // Cursor on the last line.
    if let Some(last) = body.last_mut() {
        last.push_span(Span::styled("_", Style::default().fg(Color::Yellow)));
    }
    lines.extend(body);

    let popup = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default().borders(Borders::ALL).title(Span::styled(
                " New Comment ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
        );

    frame.render_widget(popup, area);
}

/// Create a centered rect of at most `width` x `height` inside `outer`
fn centered_rect(width: u16, height: u16, outer: Rect) -> Rect {
    let popup_width = width.min(outer.width);
    let popup_height = height.min(outer.height);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((outer.height.saturating_sub(popup_height)) / 2),
            Constraint::Length(popup_height),
            Constraint::Min(0),
        ])
        .split(outer);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((outer.width.saturating_sub(popup_width)) / 2),
            Constraint::Length(popup_width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}
