//! Reading plan commands.

use chrono::NaiveDate;
use clap::Subcommand;
use magi_core::engine::block_progress;
use magi_core::model::Book;
use magi_core::{Backend, Identity, Tracker};

#[derive(Subcommand)]
pub enum ReadingAction {
    /// Add a book to the plan
    Add {
        /// Book title
        title: String,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        pages: Option<u32>,
        /// Plan week (1-52); requires --block, --start and --end
        #[arg(long, requires_all = ["block", "start", "end"])]
        week: Option<u32>,
        /// Reading block name
        #[arg(long)]
        block: Option<String>,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Book read outside the plan
        #[arg(long)]
        extra: bool,
    },
    /// List books in plan order
    List,
    /// The book scheduled for today, or the next unread one
    Current,
    /// Mark a book read or unread
    Toggle {
        /// Book ID
        id: String,
    },
    /// Rate a book 1-5 (0 clears the rating)
    Rate {
        /// Book ID
        id: String,
        stars: u8,
    },
    /// Record the current page
    Progress {
        /// Book ID
        id: String,
        page: u32,
    },
    /// Replace a book's notes
    Notes {
        /// Book ID
        id: String,
        text: String,
    },
    /// Totals and per-block progress
    Summary,
    /// Progress of each reading block
    Blocks,
    /// Remove a book
    Delete {
        /// Book ID
        id: String,
    },
}

pub fn run<B: Backend, I: Identity>(
    tracker: &mut Tracker<B, I>,
    action: ReadingAction,
    today: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ReadingAction::Add {
            title,
            author,
            pages,
            week,
            block,
            start,
            end,
            extra,
        } => {
            let mut book = Book::new(title)?;
            if let (Some(week), Some(block), Some(start), Some(end)) = (week, block, start, end) {
                book = book.scheduled(week, block, start, end)?;
            }
            book.author = author;
            book.pages = pages;
            book.is_extra = extra;
            let book = tracker.add_book(book)?;
            println!("{}", serde_json::to_string_pretty(&book)?);
        }
        ReadingAction::List => {
            let mut books = tracker.state()?.books.clone();
            books.sort_by_key(|b| (b.is_extra, b.week.unwrap_or(u32::MAX)));
            println!("{}", serde_json::to_string_pretty(&books)?);
        }
        ReadingAction::Current => {
            let current = tracker.current_book(today)?;
            println!("{}", serde_json::to_string_pretty(&current)?);
        }
        ReadingAction::Toggle { id } => {
            let book = tracker.toggle_book(&id, today)?;
            println!("{}", serde_json::to_string_pretty(&book)?);
        }
        ReadingAction::Rate { id, stars } => {
            let rating = (stars > 0).then_some(stars);
            let book = tracker.rate_book(&id, rating)?;
            println!("{}", serde_json::to_string_pretty(&book)?);
        }
        ReadingAction::Progress { id, page } => {
            let book = tracker.set_book_progress(&id, page)?;
            println!("{}", serde_json::to_string_pretty(&book)?);
        }
        ReadingAction::Notes { id, text } => {
            let notes = (!text.trim().is_empty()).then_some(text);
            let book = tracker.set_book_notes(&id, notes)?;
            println!("{}", serde_json::to_string_pretty(&book)?);
        }
        ReadingAction::Summary => {
            let summary = tracker.reading_summary()?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        ReadingAction::Blocks => {
            let blocks = block_progress(&tracker.state()?.books);
            println!("{}", serde_json::to_string_pretty(&blocks)?);
        }
        ReadingAction::Delete { id } => {
            tracker.delete_book(&id)?;
            println!("deleted {id}");
        }
    }
    Ok(())
}
