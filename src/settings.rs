use serde::{Deserialize, Serialize};

use crate::pagination::PageBudget;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Character width of the printed text column.
    pub text_width: usize,
    /// Display lines per page, headers included.
    pub lines_per_page: usize,
    /// Lines reserved for the media block on a first page with media.
    pub media_block_lines: usize,
    pub show_progress_indicator: bool,
    pub show_page_numbers: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            text_width: 60,
            lines_per_page: 24,
            media_block_lines: 8,
            show_progress_indicator: true,
            show_page_numbers: true,
        }
    }
}

impl Settings {
    pub fn budget(&self) -> PageBudget {
        PageBudget {
            text_width: self.text_width.max(1),
            lines_per_page: self.lines_per_page.max(1),
            media_block_lines: self.media_block_lines,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CfgDefaultKeymaps {
    pub next_page: String,
    pub prev_page: String,
    pub first_page: String,
    pub last_page: String,
    pub zoom_in: String,
    pub zoom_out: String,
    pub toggle_bookmark: String,
    pub show_bookmarks: String,
    pub table_of_contents: String,
    pub help: String,
    pub quit: String,
}

impl Default for CfgDefaultKeymaps {
    fn default() -> Self {
        Self {
            next_page: "l".to_string(),
            prev_page: "h".to_string(),
            first_page: "g".to_string(),
            last_page: "G".to_string(),
            zoom_in: "+".to_string(),
            zoom_out: "-".to_string(),
            toggle_bookmark: "b".to_string(),
            show_bookmarks: "B".to_string(),
            table_of_contents: "t".to_string(),
            help: "?".to_string(),
            quit: "q".to_string(),
        }
    }
}

impl CfgDefaultKeymaps {
    /// First character of a configured binding, for matching key events.
    pub fn key_of(binding: &str) -> Option<char> {
        binding.chars().next()
    }
}
