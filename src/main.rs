use keepsake::{
    cli::Cli,
    config::Config,
    logging, pagination, source,
    state::State,
    ui::viewer::Viewer,
};

use clap::Parser;
use eyre::Result;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(logging::level_from_flags(cli.verbose, cli.debug));

    let config = match &cli.config {
        Some(path) => Config::load_from(path.clone())?,
        None => match Config::new() {
            Ok(config) => config,
            Err(err) => {
                logging::warn(format!("could not load configuration: {}", err));
                // Falls back to defaults without touching the data prefix.
                Config::load_from(PathBuf::from("configuration.json"))?
            }
        },
    };

    if !cli.book.is_empty() {
        let filepath = &cli.book[0]; // Take the first export path
        if cli.dump {
            dump_book(filepath, &config)
        } else {
            run_preview(filepath, config)
        }
    } else if cli.history {
        print_history()
    } else {
        println!("No story export given. Usage: keepsake <BOOK.json> (see --help)");
        Ok(())
    }
}

fn run_preview(filepath: &str, config: Config) -> Result<()> {
    let stories = source::load_stories(Path::new(filepath))?;
    let book = pagination::paginate_book(&stories, &config.settings.budget());
    let mut viewer = Viewer::new(config, book, filepath)?;
    viewer.run()
}

/// Print the paginated book as plain text, one page at a time.
fn dump_book(filepath: &str, config: &Config) -> Result<()> {
    let stories = source::load_stories(Path::new(filepath))?;
    let book = pagination::paginate_book(&stories, &config.settings.budget());

    if book.is_empty() {
        println!("No stories in {}", filepath);
        return Ok(());
    }
    logging::info(format!(
        "paginated {} stories into {} pages",
        book.toc.len(),
        book.total_pages
    ));

    for page in &book.pages {
        println!("--- Page {}/{} ---", page.global_page, book.total_pages);

        let entry = book.toc.iter().find(|e| e.story_id == page.story_id);
        if let Some(entry) = entry {
            if page.is_first_page_of_story {
                println!("{}", entry.label);
                println!("{}", entry.created_at.format("%b %d, %Y"));
            } else {
                println!("{} (continued)", entry.label);
            }
        }

        if let Some(media) = &page.media {
            println!("[ {} ]", media.caption.as_deref().unwrap_or(&media.url));
        }

        for paragraph in &page.paragraphs {
            println!();
            for line in textwrap::wrap(paragraph, config.settings.text_width.max(1)) {
                println!("{}", line);
            }
        }
        println!();
    }

    Ok(())
}

fn print_history() -> Result<()> {
    let state = State::new()?;
    let items = state.get_from_history()?;

    if items.is_empty() {
        println!("No preview history.");
        return Ok(());
    }
    for item in items {
        let title = item.title.unwrap_or_else(|| item.filepath.clone());
        let progress = item
            .reading_progress
            .map(|p| format!(" ({:.0}%)", p * 100.0))
            .unwrap_or_default();
        println!(
            "{}  {}{}",
            item.last_read.format("%Y-%m-%d %H:%M"),
            title,
            progress
        );
    }
    Ok(())
}
