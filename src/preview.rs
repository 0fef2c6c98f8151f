use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{BookPagination, Page};
use crate::store::KeyValueStore;

pub const ZOOM_MIN: f32 = 0.5;
pub const ZOOM_MAX: f32 = 2.0;
pub const ZOOM_STEP: f32 = 0.1;

/// Interactive cursor state over a paginated book. Mutated only through the
/// transition methods on `PreviewSession`; any UI can wrap it.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationState {
    pub current_page: usize,
    pub zoom: f32,
    pub bookmarks: BTreeSet<usize>,
    pub show_toc: bool,
}

impl NavigationState {
    fn new() -> Self {
        Self {
            current_page: 0,
            zoom: 1.0,
            bookmarks: BTreeSet::new(),
            show_toc: false,
        }
    }
}

/// Handle for a pending story-list refresh. Only the most recently issued
/// token is allowed to apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshToken(u64);

#[derive(Debug, Serialize, Deserialize)]
struct SessionSnapshot {
    page: usize,
    zoom: f32,
    bookmarks: Vec<usize>,
}

/// A preview over one `BookPagination`: either closed, or open with a
/// `NavigationState`. All transitions are synchronous, total and clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewSession {
    book: BookPagination,
    nav: Option<NavigationState>,
    issued_generation: u64,
    applied_generation: u64,
}

impl PreviewSession {
    pub fn new(book: BookPagination) -> Self {
        Self {
            book,
            nav: None,
            issued_generation: 0,
            applied_generation: 0,
        }
    }

    pub fn book(&self) -> &BookPagination {
        &self.book
    }

    pub fn nav(&self) -> Option<&NavigationState> {
        self.nav.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.nav.is_some()
    }

    /// Open the preview at the first page with default zoom. Refused for an
    /// empty book: the session stays closed and `false` is returned.
    pub fn open(&mut self) -> bool {
        if self.book.is_empty() {
            return false;
        }
        self.nav = Some(NavigationState::new());
        true
    }

    /// Close the preview, discarding session bookmarks unless they were
    /// captured through `save_session` beforehand.
    pub fn close(&mut self) {
        self.nav = None;
    }

    pub fn current_page_index(&self) -> usize {
        self.nav.as_ref().map(|n| n.current_page).unwrap_or(0)
    }

    pub fn current_page(&self) -> Option<&Page> {
        let nav = self.nav.as_ref()?;
        self.book.pages.get(nav.current_page)
    }

    /// Advance one page; no-op at the last page.
    pub fn next_page(&mut self) {
        let last = self.book.total_pages.saturating_sub(1);
        if let Some(nav) = self.nav.as_mut() {
            nav.current_page = (nav.current_page + 1).min(last);
        }
    }

    /// Go back one page; no-op at the first page.
    pub fn prev_page(&mut self) {
        if let Some(nav) = self.nav.as_mut() {
            nav.current_page = nav.current_page.saturating_sub(1);
        }
    }

    /// Jump to an arbitrary page index, clamped into bounds.
    pub fn jump_to(&mut self, index: usize) {
        let last = self.book.total_pages.saturating_sub(1);
        if let Some(nav) = self.nav.as_mut() {
            nav.current_page = index.min(last);
        }
    }

    pub fn zoom(&self) -> f32 {
        self.nav.as_ref().map(|n| n.zoom).unwrap_or(1.0)
    }

    pub fn zoom_in(&mut self) {
        if let Some(nav) = self.nav.as_mut() {
            nav.zoom = step_zoom(nav.zoom, 1);
        }
    }

    pub fn zoom_out(&mut self) {
        if let Some(nav) = self.nav.as_mut() {
            nav.zoom = step_zoom(nav.zoom, -1);
        }
    }

    /// Add the current page to the bookmark set if absent, else remove it.
    pub fn toggle_bookmark(&mut self) {
        if let Some(nav) = self.nav.as_mut() {
            let page = nav.current_page;
            if !nav.bookmarks.remove(&page) {
                nav.bookmarks.insert(page);
            }
        }
    }

    pub fn is_bookmarked(&self, index: usize) -> bool {
        self.nav
            .as_ref()
            .map(|n| n.bookmarks.contains(&index))
            .unwrap_or(false)
    }

    pub fn bookmarked_pages(&self) -> Vec<usize> {
        self.nav
            .as_ref()
            .map(|n| n.bookmarks.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn toggle_toc(&mut self) {
        if let Some(nav) = self.nav.as_mut() {
            nav.show_toc = !nav.show_toc;
        }
    }

    pub fn show_toc(&self) -> bool {
        self.nav.as_ref().map(|n| n.show_toc).unwrap_or(false)
    }

    /// Reading progress in percent. 0 for a closed session or an empty book,
    /// so the caller never divides by zero.
    pub fn progress_percent(&self) -> f32 {
        match self.nav.as_ref() {
            Some(nav) if self.book.total_pages > 0 => {
                (nav.current_page + 1) as f32 / self.book.total_pages as f32 * 100.0
            }
            _ => 0.0,
        }
    }

    /// Start a story-list refresh. Issuing a new token supersedes every
    /// earlier one.
    pub fn begin_refresh(&mut self) -> RefreshToken {
        self.issued_generation += 1;
        RefreshToken(self.issued_generation)
    }

    /// Apply a recomputed pagination if `token` is still the latest. The
    /// current page is re-clamped against the new total rather than reset;
    /// bookmarks that fall out of range are dropped. Returns whether the
    /// result was applied.
    pub fn apply_refresh(&mut self, token: RefreshToken, book: BookPagination) -> bool {
        if token.0 != self.issued_generation || token.0 <= self.applied_generation {
            return false;
        }
        self.applied_generation = token.0;
        self.book = book;

        if self.book.pages.is_empty() {
            self.nav = None;
        } else if let Some(nav) = self.nav.as_mut() {
            let last = self.book.total_pages - 1;
            nav.current_page = nav.current_page.min(last);
            nav.bookmarks.retain(|&b| b <= last);
        }
        true
    }

    /// Capture the open session (page, zoom, bookmarks) into the injected
    /// store. No-op when closed.
    pub fn save_session(&self, store: &mut dyn KeyValueStore, book_key: &str) {
        let Some(nav) = self.nav.as_ref() else {
            return;
        };
        let snapshot = SessionSnapshot {
            page: nav.current_page,
            zoom: nav.zoom,
            bookmarks: nav.bookmarks.iter().copied().collect(),
        };
        if let Ok(encoded) = serde_json::to_string(&snapshot) {
            store.set(&session_key(book_key), &encoded);
        }
    }

    /// Restore a previously captured session into the open preview, clamping
    /// everything against the current pagination. No-op when closed or when
    /// nothing was captured.
    pub fn restore_session(&mut self, store: &dyn KeyValueStore, book_key: &str) {
        if self.book.is_empty() {
            return;
        }
        let Some(encoded) = store.get(&session_key(book_key)) else {
            return;
        };
        let Ok(snapshot) = serde_json::from_str::<SessionSnapshot>(&encoded) else {
            return;
        };
        let last = self.book.total_pages - 1;
        if let Some(nav) = self.nav.as_mut() {
            nav.current_page = snapshot.page.min(last);
            nav.zoom = step_zoom(snapshot.zoom, 0);
            nav.bookmarks = snapshot
                .bookmarks
                .into_iter()
                .filter(|&b| b <= last)
                .collect();
        }
    }
}

fn session_key(book_key: &str) -> String {
    format!("preview:{}", book_key)
}

/// Move `zoom` by `steps` tenths, clamped to [ZOOM_MIN, ZOOM_MAX]. Working
/// in rounded tenths keeps repeated steps from drifting.
fn step_zoom(zoom: f32, steps: i32) -> f32 {
    let tenths = (zoom * 10.0).round() as i32 + steps;
    let clamped = tenths.clamp((ZOOM_MIN * 10.0) as i32, (ZOOM_MAX * 10.0) as i32);
    clamped as f32 / 10.0
}
