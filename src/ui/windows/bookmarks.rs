use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::ui::windows::centered_popup_area;

pub struct BookmarksWindow {
    pub visible: bool,
    /// Bookmarked page index paired with a display label.
    pub items: Vec<(usize, String)>,
    pub selected_index: usize,
}

impl BookmarksWindow {
    pub fn new() -> Self {
        Self {
            visible: false,
            items: Vec::new(),
            selected_index: 0,
        }
    }

    pub fn set_items(&mut self, items: Vec<(usize, String)>) {
        self.items = items;
        self.selected_index = 0;
    }

    pub fn next_item(&mut self) {
        if !self.items.is_empty() {
            self.selected_index = (self.selected_index + 1).min(self.items.len() - 1);
        }
    }

    pub fn previous_item(&mut self) {
        if !self.items.is_empty() {
            self.selected_index = self.selected_index.saturating_sub(1);
        }
    }

    pub fn get_selected_page(&self) -> Option<usize> {
        self.items.get(self.selected_index).map(|(page, _)| *page)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let popup_area = centered_popup_area(area, 50, 60);

        frame.render_widget(Clear, popup_area);

        if self.items.is_empty() {
            let empty_text = vec![
                Line::from("No bookmarks in this session"),
                Line::from(""),
                Line::from(Span::styled(
                    "Press any key to close",
                    Style::default().add_modifier(Modifier::ITALIC),
                )),
            ];

            let paragraph = Paragraph::new(empty_text)
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().title("Bookmarks").borders(Borders::ALL));

            frame.render_widget(paragraph, popup_area);
            return;
        }

        let items: Vec<ListItem> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, (page, label))| {
                let style = if i == self.selected_index {
                    Style::default().bg(Color::Blue).fg(Color::White)
                } else {
                    Style::default()
                };

                ListItem::new(Line::from(format!("p. {}  {}", page + 1, label))).style(style)
            })
            .collect();

        let list =
            List::new(items).block(Block::default().title("Bookmarks").borders(Borders::ALL));

        frame.render_widget(list, popup_area);
    }
}
