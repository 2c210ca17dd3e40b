//! Terminal adapters for the catalog page.

use std::io::{self, BufRead, Write};

use async_trait::async_trait;
use bookshelf_app::{BookRow, TableView, EMPTY_LIST_MESSAGE};
use bookshelf_kernel::{Confirm, FieldErrors, Notifier};

/// Success notices on stdout, failures on stderr.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("{message}");
    }
}

/// Asks on stdin unless `--yes` was given.
pub struct PromptConfirm {
    pub assume_yes: bool,
}

#[async_trait]
impl Confirm for PromptConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        let prompt = prompt.to_string();
        let answer = tokio::task::spawn_blocking(move || {
            eprint!("{prompt} [y/N] ");
            io::stderr().flush().ok();
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line).map(|_| line)
        })
        .await;

        match answer {
            Ok(Ok(line)) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Ok(Err(error)) => {
                tracing::warn!(%error, "could not read confirmation");
                false
            }
            Err(error) => {
                tracing::warn!(%error, "confirmation prompt aborted");
                false
            }
        }
    }
}

pub fn print_field_errors(errors: &FieldErrors) {
    for (field, messages) in errors.iter() {
        for message in messages {
            eprintln!("{field}: {message}");
        }
    }
}

pub fn render_table(table: &TableView) -> String {
    match table {
        TableView::Loading => "Loading...".to_string(),
        TableView::Empty => EMPTY_LIST_MESSAGE.to_string(),
        TableView::Rows(rows) => render_rows(rows),
    }
}

const HEADERS: [&str; 6] = ["ID", "Title", "Author", "Published", "ISBN", "Cover"];

fn render_rows(rows: &[BookRow]) -> String {
    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|row| {
            [
                row.id.clone(),
                row.title.clone(),
                row.author.clone(),
                row.publication_year.to_string(),
                row.isbn.clone(),
                row.cover.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|header| header.chars().count());
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = HEADERS.map(str::to_string);
    std::iter::once(&header)
        .chain(&cells)
        .map(|line| {
            line.iter()
                .zip(widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
