use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Paragraph, Wrap},
};

use eyre::Result;

use crate::config::Config;
use crate::models::BookPagination;
use crate::preview::PreviewSession;
use crate::settings::CfgDefaultKeymaps;
use crate::state::State;
use crate::ui::windows::{
    bookmarks::BookmarksWindow, help::HelpWindow, toc::TocWindow,
};

/// Interactive paged previewer. Renders `BookPagination` pages and drives a
/// `PreviewSession`; no pagination decisions happen here.
pub struct Viewer {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    config: Config,
    db_state: State,
    session: PreviewSession,
    book_path: String,
    book_key: String,
    toc_window: TocWindow,
    bookmarks_window: BookmarksWindow,
    help_window: HelpWindow,
    message: Option<String>,
    should_quit: bool,
}

impl Viewer {
    pub fn new(config: Config, book: BookPagination, book_path: &str) -> Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        let db_state = State::new()?;
        let book_key = State::book_key(book_path);

        Ok(Self {
            terminal,
            config,
            db_state,
            session: PreviewSession::new(book),
            book_path: book_path.to_string(),
            book_key,
            toc_window: TocWindow::new(),
            bookmarks_window: BookmarksWindow::new(),
            help_window: HelpWindow::new(),
            message: None,
            should_quit: false,
        })
    }

    /// Run the preview loop until quit, persisting the session on the way
    /// out.
    pub fn run(&mut self) -> Result<()> {
        if !self.session.open() {
            return Err(eyre::eyre!(
                "{} has no pages to preview",
                self.book_path
            ));
        }
        self.session.restore_session(&self.db_state, &self.book_key);
        self.toc_window.set_entries(self.session.book().toc.clone());

        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
        self.terminal.clear()?;
        self.terminal.hide_cursor()?;

        loop {
            if self.should_quit {
                break;
            }

            {
                let Self {
                    terminal,
                    config,
                    session,
                    toc_window,
                    bookmarks_window,
                    help_window,
                    message,
                    ..
                } = self;
                terminal.draw(|f| {
                    render_frame(
                        f,
                        session,
                        config,
                        toc_window,
                        bookmarks_window,
                        help_window,
                        message.as_deref(),
                    );
                })?;
            }

            if !crossterm::event::poll(Duration::from_secs(60))? {
                continue;
            }

            if let Ok(event) = crossterm::event::read() {
                match event {
                    Event::Key(key) => {
                        if key.kind == KeyEventKind::Press {
                            self.handle_key_event(key);
                        }
                    }
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        self.persist_session()?;

        self.terminal.clear()?;
        self.terminal.show_cursor()?;
        crossterm::execute!(io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;
        crossterm::terminal::disable_raw_mode()?;

        Ok(())
    }

    fn persist_session(&mut self) -> Result<()> {
        let Self {
            session,
            db_state,
            book_key,
            ..
        } = self;
        session.save_session(db_state, book_key);

        let title = Path::new(&self.book_path)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string());
        let progress = self.session.progress_percent() / 100.0;
        self.db_state.update_library(
            &self.book_path,
            title.as_deref(),
            Some(self.session.book().toc.len() as i64),
            Some(progress),
        )?;
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        self.message = None;

        if self.help_window.visible {
            self.help_window.visible = false;
            return;
        }

        if self.session.show_toc() {
            self.handle_toc_key(key);
            return;
        }

        if self.bookmarks_window.visible {
            self.handle_bookmarks_key(key);
            return;
        }

        match key.code {
            KeyCode::Right | KeyCode::PageDown | KeyCode::Char(' ') => self.session.next_page(),
            KeyCode::Left | KeyCode::PageUp => self.session.prev_page(),
            KeyCode::Home => self.session.jump_to(0),
            KeyCode::End => self.session.jump_to(usize::MAX),
            KeyCode::Char(c) => self.handle_char(c),
            _ => {}
        }
    }

    fn handle_toc_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.toc_window.next_entry(),
            KeyCode::Up | KeyCode::Char('k') => self.toc_window.previous_entry(),
            KeyCode::Enter => {
                let target = self
                    .toc_window
                    .get_selected_entry()
                    .map(|entry| entry.global_page.saturating_sub(1));
                if let Some(page) = target {
                    self.session.jump_to(page);
                }
                self.close_toc();
            }
            _ => self.close_toc(),
        }
    }

    fn close_toc(&mut self) {
        if self.session.show_toc() {
            self.session.toggle_toc();
        }
        self.toc_window.visible = false;
    }

    fn handle_bookmarks_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.bookmarks_window.next_item(),
            KeyCode::Up | KeyCode::Char('k') => self.bookmarks_window.previous_item(),
            KeyCode::Enter => {
                if let Some(page) = self.bookmarks_window.get_selected_page() {
                    self.session.jump_to(page);
                }
                self.bookmarks_window.visible = false;
            }
            _ => self.bookmarks_window.visible = false,
        }
    }

    fn handle_char(&mut self, c: char) {
        let keymaps = self.config.keymap_user_dict().clone();
        let is = |binding: &str| CfgDefaultKeymaps::key_of(binding) == Some(c);

        if is(&keymaps.quit) {
            self.should_quit = true;
        } else if is(&keymaps.next_page) {
            self.session.next_page();
        } else if is(&keymaps.prev_page) {
            self.session.prev_page();
        } else if is(&keymaps.first_page) {
            self.session.jump_to(0);
        } else if is(&keymaps.last_page) {
            self.session.jump_to(usize::MAX);
        } else if is(&keymaps.zoom_in) || c == '=' {
            self.session.zoom_in();
        } else if is(&keymaps.zoom_out) {
            self.session.zoom_out();
        } else if is(&keymaps.toggle_bookmark) {
            self.session.toggle_bookmark();
            let index = self.session.current_page_index();
            self.message = Some(if self.session.is_bookmarked(index) {
                format!("Bookmarked page {}", index + 1)
            } else {
                format!("Removed bookmark on page {}", index + 1)
            });
        } else if is(&keymaps.show_bookmarks) {
            self.open_bookmarks();
        } else if is(&keymaps.table_of_contents) {
            self.session.toggle_toc();
            self.toc_window.visible = self.session.show_toc();
        } else if is(&keymaps.help) {
            self.help_window.toggle();
        }
    }

    fn open_bookmarks(&mut self) {
        let book = self.session.book();
        let items: Vec<(usize, String)> = self
            .session
            .bookmarked_pages()
            .into_iter()
            .map(|index| {
                let label = book
                    .pages
                    .get(index)
                    .and_then(|page| {
                        book.toc
                            .iter()
                            .find(|entry| entry.story_id == page.story_id)
                            .map(|entry| entry.label.clone())
                    })
                    .unwrap_or_default();
                (index, label)
            })
            .collect();
        self.bookmarks_window.set_items(items);
        self.bookmarks_window.visible = true;
    }
}

fn render_frame(
    frame: &mut Frame,
    session: &PreviewSession,
    config: &Config,
    toc_window: &TocWindow,
    bookmarks_window: &BookmarksWindow,
    help_window: &HelpWindow,
    message: Option<&str>,
) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    render_page(frame, session, config, chunks[0]);
    render_footer(frame, session, config, chunks[1], message);

    toc_window.render(frame, area);
    bookmarks_window.render(frame, area);
    help_window.render(frame, area, config.keymap_user_dict());
}

fn render_page(frame: &mut Frame, session: &PreviewSession, config: &Config, area: Rect) {
    let Some(page) = session.current_page() else {
        let paragraph = Paragraph::new("This book has no pages.")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    let toc_entry = session
        .book()
        .toc
        .iter()
        .find(|entry| entry.story_id == page.story_id);

    if let Some(entry) = toc_entry {
        if page.is_first_page_of_story {
            lines.push(Line::styled(
                entry.label.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            lines.push(Line::styled(
                entry.created_at.format("%b %d, %Y").to_string(),
                Style::default().fg(Color::DarkGray),
            ));
            lines.push(Line::from(""));
        } else {
            lines.push(Line::styled(
                format!("{} (continued)", entry.label),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ));
            lines.push(Line::from(""));
        }
    }

    if let Some(media) = &page.media {
        let caption = media
            .caption
            .clone()
            .unwrap_or_else(|| media.url.clone());
        lines.push(Line::styled(
            format!("[ {} ]", caption),
            Style::default().fg(Color::DarkGray),
        ));
        lines.push(Line::from(""));
    }

    for (i, paragraph) in page.paragraphs.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(paragraph.clone()));
    }

    // Zoom scales the rendered page column; pagination itself is untouched.
    let column = ((config.settings.text_width as f32 * session.zoom()) as u16)
        .clamp(20, area.width.max(20));
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(column),
            Constraint::Fill(1),
        ])
        .split(area);

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, columns[1]);
}

fn render_footer(
    frame: &mut Frame,
    session: &PreviewSession,
    config: &Config,
    area: Rect,
    message: Option<&str>,
) {
    let text = if let Some(message) = message {
        message.to_string()
    } else {
        let total = session.book().total_pages;
        let index = session.current_page_index();
        let mut parts: Vec<String> = Vec::new();
        if config.settings.show_page_numbers {
            parts.push(format!("Page {}/{}", index + 1, total));
        }
        if config.settings.show_progress_indicator {
            parts.push(format!("{:.0}%", session.progress_percent()));
        }
        parts.push(format!("zoom {:.1}x", session.zoom()));
        if session.is_bookmarked(index) {
            parts.push("bookmarked".to_string());
        }
        parts.join("  ")
    };

    let footer = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, area);
}
