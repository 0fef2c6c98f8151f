use keepsake::pagination::{PageBudget, allocate_pages, paginate_book, split_paragraphs, total_pages_for_story};
use keepsake::source::stories_from_value;
use serde_json::json;

fn tight_budget() -> PageBudget {
    PageBudget {
        text_width: 80,
        lines_per_page: 3,
        media_block_lines: 0,
    }
}

#[test]
fn test_export_to_book_end_to_end() {
    let export = json!([
        {
            "id": "s1",
            "title": "Three Parts",
            "content": "Para one.\n\nPara two.\n\nPara three.",
            "created_at": "2021-06-03T10:15:00Z"
        },
        {
            "id": "s2",
            "title": "Coda",
            "content": "Single paragraph.",
            "created_at": "2021-07-01T08:00:00Z"
        }
    ]);

    let stories = stories_from_value(&export);
    let book = paginate_book(&stories, &tight_budget());

    assert_eq!(book.total_pages, 4);
    assert_eq!(book.pages.len(), book.total_pages);

    // Global numbering is 1..=total with no gaps.
    let numbers: Vec<usize> = book.pages.iter().map(|p| p.global_page).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);

    // Story 2's only page sits at global page 4.
    assert_eq!(book.pages[3].story_id, "s2");
    assert!(book.pages[3].is_first_page_of_story);
    assert!(book.pages[3].is_last_page_of_story);

    // One TOC entry per story, pointing at its first global page.
    assert_eq!(book.toc.len(), 2);
    assert_eq!(book.toc[0].global_page, 1);
    assert_eq!(book.toc[1].global_page, 4);
}

#[test]
fn test_paragraph_conservation_across_book() {
    let export = json!([
        { "id": "a", "title": "A", "content": "One.\n\nTwo.\n\nThree.\n\nFour.", "created_at": "2021-01-01T00:00:00Z" },
        { "id": "b", "title": "B", "content": "", "created_at": "2021-01-02T00:00:00Z" },
        { "id": "c", "title": "C", "content": "Lone paragraph.", "created_at": "2021-01-03T00:00:00Z" }
    ]);
    let stories = stories_from_value(&export);
    let book = paginate_book(&stories, &tight_budget());

    for story in &stories {
        let expected = split_paragraphs(&story.content);
        let collected: Vec<String> = book
            .pages
            .iter()
            .filter(|p| p.story_id == story.id)
            .flat_map(|p| p.paragraphs.clone())
            .collect();
        assert_eq!(collected, expected, "paragraphs lost for story {}", story.id);
    }
}

#[test]
fn test_count_agreement_matches_allocation() {
    let export = json!([
        { "id": "a", "content": "One.\n\nTwo.\n\nThree.\n\nFour.\n\nFive." },
        { "id": "b", "content": "" },
        { "id": "c", "content": "Lone paragraph." }
    ]);
    let stories = stories_from_value(&export);
    let budget = tight_budget();

    for story in &stories {
        assert_eq!(
            total_pages_for_story(story, &budget),
            allocate_pages(story, &budget).len()
        );
    }
}

#[test]
fn test_empty_story_still_gets_a_toc_entry() {
    let export = json!([
        { "id": "a", "title": "Empty", "content": null },
        { "id": "b", "title": "Full", "content": "Hello." }
    ]);
    let stories = stories_from_value(&export);
    let book = paginate_book(&stories, &tight_budget());

    assert_eq!(book.total_pages, 2);
    assert_eq!(book.toc.len(), 2);
    assert_eq!(book.toc[0].label, "Empty");
    assert_eq!(book.toc[0].global_page, 1);
    assert!(book.pages[0].paragraphs.is_empty());
}
