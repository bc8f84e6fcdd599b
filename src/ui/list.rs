use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::types::ItemKind;

use super::text;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("{} ({})", app.current_tab().name, app.items.len()));

    if app.items.is_empty() {
        let message = if app.loading {
            format!("{} Loading list...", text::spinner_frame(app.spinner_frame))
        } else {
            "No items".to_string()
        };
        let empty = Paragraph::new(message)
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let title_style = if i == app.selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let kind_color = match item.kind {
                ItemKind::Pr => Color::Magenta,
                ItemKind::Issue => Color::Green,
            };

            ListItem::new(vec![
                Line::from(Span::styled(item.title.as_str(), title_style)),
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        text::item_description(item),
                        Style::default().fg(kind_color),
                    ),
                ]),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(Some(app.selected));

    frame.render_stateful_widget(list, area, &mut state);
}
