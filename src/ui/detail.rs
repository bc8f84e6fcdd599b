use chrono::Utc;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::App;
use crate::types::{CommentPage, ItemDetail};

use super::text;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Details");

    let (message, color) = if app.detail_loading {
        (
            format!("{} Loading details...", text::spinner_frame(app.spinner_frame)),
            Color::Gray,
        )
    } else if let Some(err) = &app.detail_error {
        (format!("Error loading details: {}", err), Color::Red)
    } else if let Some(detail) = &app.detail {
        render_detail(frame, detail, app.scroll_offset, block, area);
        return;
    } else {
        ("No details loaded.".to_string(), Color::Gray)
    };

    let empty = Paragraph::new(message)
        .block(block)
        .style(Style::default().fg(color));
    frame.render_widget(empty, area);
}

fn render_detail(frame: &mut Frame, detail: &ItemDetail, offset: usize, block: Block<'_>, area: Rect) {
    let scroll_offset = offset.min(max_scroll(detail));
    let lines = detail_lines(detail);

    frame.render_widget(Clear, area);

    let body = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((u16::try_from(scroll_offset).unwrap_or(u16::MAX), 0));

    frame.render_widget(body, area);
}

/// Last scroll offset that still shows content.
pub fn max_scroll(detail: &ItemDetail) -> usize {
    detail_lines(detail).len().saturating_sub(1)
}

fn detail_lines(detail: &ItemDetail) -> Vec<Line<'_>> {
    let now = Utc::now();
    let mut lines = vec![
        Line::from(Span::styled(
            detail.item.title.as_str(),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            text::detail_info(detail, now),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    if let Some(extra) = text::detail_extra(detail) {
        lines.push(Line::from(Span::styled(
            extra,
            Style::default().fg(Color::Gray),
        )));
    }

    lines.push(Line::from(""));
    for l in detail.body.trim().lines() {
        lines.push(Line::from(l.replace('\t', "    ")));
    }
    lines.push(Line::from(""));

    lines.extend(comment_lines(&detail.comments));
    lines
}

fn comment_lines(page: &CommentPage) -> Vec<Line<'static>> {
    let now = Utc::now();
    let tree = Style::default().fg(Color::DarkGray);
    let muted = Style::default().fg(Color::Gray);

    let mut lines = vec![Line::from(Span::styled(
        text::comments_header(page),
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    ))];

    for comment in &page.comments {
        lines.push(Line::from(vec![
            Span::styled("|- ", tree),
            Span::styled(
                text::comment_byline(comment, now),
                Style::default().fg(Color::Cyan),
            ),
        ]));
        for l in text::comment_body(&comment.body).lines() {
            lines.push(Line::from(vec![
                Span::styled("|  ", tree),
                Span::raw(l.replace('\t', "    ")),
            ]));
        }
    }

    if let Some(footer) = text::page_footer(page) {
        lines.push(Line::from(vec![
            Span::styled("|  ", tree),
            Span::styled(footer, muted),
        ]));
    }
    lines
}
