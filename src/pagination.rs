use crate::models::{BookPagination, Page, Story, TocEntry};

/// Line reservation at the top of a story's first page: title, date and a
/// separating blank line.
const FIRST_PAGE_HEADER_LINES: usize = 3;
/// Continuation pages only carry a page-number line.
const CONTINUATION_HEADER_LINES: usize = 1;

/// Capacity of one rendered page, in display lines at a fixed text width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBudget {
    pub text_width: usize,
    pub lines_per_page: usize,
    /// Lines reserved for the media block on a first page that has media.
    pub media_block_lines: usize,
}

impl Default for PageBudget {
    fn default() -> Self {
        Self {
            text_width: 60,
            lines_per_page: 24,
            media_block_lines: 8,
        }
    }
}

impl PageBudget {
    fn first_page_capacity(&self, story: &Story) -> usize {
        let mut reserved = FIRST_PAGE_HEADER_LINES;
        if !story.media.is_empty() {
            reserved += self.media_block_lines;
        }
        self.lines_per_page.saturating_sub(reserved).max(1)
    }

    fn continuation_capacity(&self) -> usize {
        self.lines_per_page
            .saturating_sub(CONTINUATION_HEADER_LINES)
            .max(1)
    }
}

/// Split raw story content on blank-line boundaries into non-empty trimmed
/// paragraph units. Pure; paragraphs are never fragmented further.
pub fn split_paragraphs(content: &str) -> Vec<String> {
    content
        .split("\n\n")
        .flat_map(|chunk| chunk.split("\r\n\r\n"))
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Number of display lines a paragraph occupies when wrapped to `width`.
pub fn paragraph_lines(paragraph: &str, width: usize) -> usize {
    textwrap::wrap(paragraph, width.max(1)).len().max(1)
}

/// Line cost of a page holding `paragraphs`, counting one blank separator
/// line between adjacent paragraphs.
fn page_line_cost(paragraphs: &[String], width: usize) -> usize {
    if paragraphs.is_empty() {
        return 0;
    }
    let text: usize = paragraphs.iter().map(|p| paragraph_lines(p, width)).sum();
    text + paragraphs.len() - 1
}

/// Greedily group a story's paragraphs into per-page chunks. A paragraph
/// that alone exceeds the page capacity is still placed whole; empty content
/// yields exactly one (empty) chunk so every story occupies a page.
fn plan_pages(story: &Story, budget: &PageBudget) -> Vec<Vec<String>> {
    let paragraphs = split_paragraphs(&story.content);
    if paragraphs.is_empty() {
        return vec![Vec::new()];
    }

    let width = budget.text_width.max(1);
    let mut pages: Vec<Vec<String>> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut used = 0usize;
    let mut capacity = budget.first_page_capacity(story);

    for paragraph in paragraphs {
        let lines = paragraph_lines(&paragraph, width);
        // One blank line separates paragraphs already on the page.
        let cost = if current.is_empty() { lines } else { lines + 1 };

        if !current.is_empty() && used + cost > capacity {
            pages.push(std::mem::take(&mut current));
            capacity = budget.continuation_capacity();
            used = lines;
        } else {
            used += cost;
        }
        current.push(paragraph);
    }
    pages.push(current);
    pages
}

/// Distribute one story's paragraphs (and its first media item) across one
/// or more pages. `global_page` is provisional (equal to `page_in_story`)
/// until the aggregator renumbers it.
pub fn allocate_pages(story: &Story, budget: &PageBudget) -> Vec<Page> {
    let chunks = plan_pages(story, budget);
    let total = chunks.len();
    let width = budget.text_width.max(1);

    chunks
        .into_iter()
        .enumerate()
        .map(|(i, paragraphs)| {
            let capacity = if i == 0 {
                budget.first_page_capacity(story)
            } else {
                budget.continuation_capacity()
            };
            let oversized = page_line_cost(&paragraphs, width) > capacity;
            Page {
                story_id: story.id.clone(),
                page_in_story: i + 1,
                global_page: i + 1,
                media: if i == 0 { story.media.first().cloned() } else { None },
                is_first_page_of_story: i == 0,
                is_last_page_of_story: i + 1 == total,
                content_overflows: i + 1 < total || oversized,
                paragraphs,
            }
        })
        .collect()
}

/// Standalone page count for one story. Agrees exactly with
/// `allocate_pages(story, budget).len()`.
pub fn total_pages_for_story(story: &Story, budget: &PageBudget) -> usize {
    plan_pages(story, budget).len()
}

/// Run the allocator over every story in supplied order and assign book
/// global page numbers as a running 1-based counter with no gaps or resets.
pub fn paginate_book(stories: &[Story], budget: &PageBudget) -> BookPagination {
    let mut pages: Vec<Page> = Vec::new();
    let mut toc: Vec<TocEntry> = Vec::new();

    for story in stories {
        let first_global = pages.len() + 1;
        toc.push(TocEntry {
            story_id: story.id.clone(),
            label: story.display_title().to_string(),
            created_at: story.created_at,
            global_page: first_global,
        });
        for mut page in allocate_pages(story, budget) {
            page.global_page = pages.len() + 1;
            pages.push(page);
        }
    }

    BookPagination {
        total_pages: pages.len(),
        pages,
        toc,
    }
}
