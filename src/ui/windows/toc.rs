use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::models::TocEntry;
use crate::ui::windows::centered_popup_area;

pub struct TocWindow {
    pub visible: bool,
    pub entries: Vec<TocEntry>,
    pub selected_index: usize,
}

impl TocWindow {
    pub fn new() -> Self {
        Self {
            visible: false,
            entries: Vec::new(),
            selected_index: 0,
        }
    }

    pub fn set_entries(&mut self, entries: Vec<TocEntry>) {
        self.entries = entries;
        self.selected_index = 0;
    }

    pub fn next_entry(&mut self) {
        if !self.entries.is_empty() {
            self.selected_index = (self.selected_index + 1).min(self.entries.len() - 1);
        }
    }

    pub fn previous_entry(&mut self) {
        if !self.entries.is_empty() {
            self.selected_index = self.selected_index.saturating_sub(1);
        }
    }

    pub fn get_selected_entry(&self) -> Option<&TocEntry> {
        self.entries.get(self.selected_index)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let popup_area = centered_popup_area(area, 50, 80);

        frame.render_widget(Clear, popup_area);

        if self.entries.is_empty() {
            let empty_text = vec![
                Line::from("This book has no stories yet"),
                Line::from(""),
                Line::from(Span::styled(
                    "Press any key to close",
                    Style::default().add_modifier(Modifier::ITALIC),
                )),
            ];

            let paragraph = Paragraph::new(empty_text)
                .style(Style::default().fg(Color::DarkGray))
                .block(
                    Block::default()
                        .title("Table of Contents")
                        .borders(Borders::ALL),
                );

            frame.render_widget(paragraph, popup_area);
            return;
        }

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let style = if i == self.selected_index {
                    Style::default().bg(Color::Blue).fg(Color::White)
                } else {
                    Style::default()
                };

                let content = format!(
                    "{}  ({})  p. {}",
                    entry.label,
                    entry.created_at.format("%b %d, %Y"),
                    entry.global_page
                );

                ListItem::new(Line::from(content)).style(style)
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .title("Table of Contents")
                .borders(Borders::ALL),
        );

        frame.render_widget(list, popup_area);
    }
}
