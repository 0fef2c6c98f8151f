use keepsake::models::Story;
use keepsake::pagination::{PageBudget, paginate_book};
use keepsake::preview::PreviewSession;
use keepsake::store::{KeyValueStore, MemoryStore};
use chrono::Utc;

fn story(id: &str, content: &str) -> Story {
    Story {
        id: id.to_string(),
        title: Some(format!("Story {}", id)),
        content: content.to_string(),
        created_at: Utc::now(),
        media: Vec::new(),
    }
}

fn tight_budget() -> PageBudget {
    PageBudget {
        text_width: 80,
        lines_per_page: 3,
        media_block_lines: 0,
    }
}

#[test]
fn test_preview_walkthrough() {
    let stories = vec![
        story("a", "Para one.\n\nPara two.\n\nPara three."),
        story("b", "Coda."),
    ];
    let book = paginate_book(&stories, &tight_budget());
    let mut session = PreviewSession::new(book);

    assert!(session.open());
    assert_eq!(session.current_page_index(), 0);

    // Walk to the end; next_page saturates at the last page.
    session.next_page();
    session.next_page();
    session.next_page();
    assert_eq!(session.current_page_index(), 3);
    session.next_page();
    assert_eq!(session.current_page_index(), 3);
    assert!((session.progress_percent() - 100.0).abs() < 1e-4);

    // Bookmark, walk back, and return via the bookmark.
    session.toggle_bookmark();
    assert!(session.is_bookmarked(3));
    session.prev_page();
    session.prev_page();
    assert_eq!(session.current_page_index(), 1);
    let bookmark = session.bookmarked_pages()[0];
    session.jump_to(bookmark);
    assert_eq!(session.current_page_index(), 3);

    // TOC toggling is independent of the cursor.
    session.toggle_toc();
    assert!(session.show_toc());
    session.toggle_toc();
    assert!(!session.show_toc());

    session.close();
    assert!(!session.is_open());
}

#[test]
fn test_refresh_supersedes_older_fetch() {
    let initial = paginate_book(
        &[story("a", "Para one.\n\nPara two.\n\nPara three.")],
        &tight_budget(),
    );
    let mut session = PreviewSession::new(initial);
    session.open();
    session.jump_to(2);

    // Two refetches race; the first one to be issued loses.
    let older = session.begin_refresh();
    let newer = session.begin_refresh();

    let shrunk = paginate_book(&[story("a", "Para one.")], &tight_budget());
    let grown = paginate_book(
        &[
            story("a", "Para one.\n\nPara two.\n\nPara three."),
            story("b", "Coda."),
        ],
        &tight_budget(),
    );

    assert!(session.apply_refresh(newer, grown));
    assert!(!session.apply_refresh(older, shrunk));

    assert_eq!(session.book().total_pages, 4);
    // Cursor kept, still in bounds.
    assert_eq!(session.current_page_index(), 2);
}

#[test]
fn test_session_persists_through_injected_store() {
    let stories = vec![story("a", "Para one.\n\nPara two.\n\nPara three.")];
    let book = paginate_book(&stories, &tight_budget());

    let mut store = MemoryStore::new();
    {
        let mut session = PreviewSession::new(book.clone());
        session.open();
        session.jump_to(1);
        session.toggle_bookmark();
        session.zoom_in();
        session.zoom_in();
        session.save_session(&mut store, "export-key");
        session.close();
    }
    assert!(store.get("preview:export-key").is_some());

    let mut session = PreviewSession::new(book);
    session.open();
    session.restore_session(&store, "export-key");
    assert_eq!(session.current_page_index(), 1);
    assert!(session.is_bookmarked(1));
    assert!((session.zoom() - 1.2).abs() < 1e-6);
}
