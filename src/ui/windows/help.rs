use ratatui::{
    Frame,
    layout::Rect,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::settings::CfgDefaultKeymaps;
use crate::ui::windows::centered_popup_area;

pub struct HelpWindow {
    pub visible: bool,
}

impl HelpWindow {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, keymaps: &CfgDefaultKeymaps) {
        if !self.visible {
            return;
        }

        let popup_area = centered_popup_area(area, 50, 70);

        frame.render_widget(Clear, popup_area);

        let text = format!(
            "{} / Right  next page\n\
             {} / Left   previous page\n\
             {}          first page\n\
             {}          last page\n\
             {}          zoom in\n\
             {}          zoom out\n\
             {}          toggle bookmark\n\
             {}          show bookmarks\n\
             {}          table of contents\n\
             {}          this help\n\
             {}          quit",
            keymaps.next_page,
            keymaps.prev_page,
            keymaps.first_page,
            keymaps.last_page,
            keymaps.zoom_in,
            keymaps.zoom_out,
            keymaps.toggle_bookmark,
            keymaps.show_bookmarks,
            keymaps.table_of_contents,
            keymaps.help,
            keymaps.quit,
        );

        let paragraph =
            Paragraph::new(text).block(Block::default().title("Help").borders(Borders::ALL));

        frame.render_widget(paragraph, popup_area);
    }
}
