use chrono::{DateTime, Utc};

/// A single attachment belonging to a story. Only the first item of a story
/// is ever placed on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    pub id: String,
    pub content_type: String,
    pub url: String,
    pub caption: Option<String>,
}

/// A user-authored text entry with optional attached media, the base content
/// unit of a book. Treated as immutable once paginated for a render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Story {
    pub id: String,
    pub title: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub media: Vec<MediaItem>,
}

impl Story {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled story")
    }
}

/// A derived rendering unit: a bounded slice of one story's paragraphs plus
/// at most one media item. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub story_id: String,
    /// 1-based page number within the owning story.
    pub page_in_story: usize,
    /// 1-based page number within the whole book.
    pub global_page: usize,
    pub paragraphs: Vec<String>,
    pub media: Option<MediaItem>,
    pub is_first_page_of_story: bool,
    pub is_last_page_of_story: bool,
    /// True when the story continues past this page, or when a single
    /// oversized paragraph exceeds the page capacity on its own.
    pub content_overflows: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    pub story_id: String,
    pub label: String,
    pub created_at: DateTime<Utc>,
    /// First global page of the story, 1-based.
    pub global_page: usize,
}

/// The paginated book: every story's pages concatenated in book order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookPagination {
    pub pages: Vec<Page>,
    pub total_pages: usize,
    pub toc: Vec<TocEntry>,
}

impl BookPagination {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LibraryItem {
    pub last_read: DateTime<Utc>,
    pub filepath: String,
    pub title: Option<String>,
    pub story_count: Option<i64>,
    pub reading_progress: Option<f32>,
}
