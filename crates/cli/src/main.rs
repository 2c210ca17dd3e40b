use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use bookshelf_app::{CatalogPage, DeleteOutcome, SubmitOutcome};
use bookshelf_http::{BookStore, HttpBooksClient};
use bookshelf_kernel::settings::Settings;
use bookshelf_kernel::BookPatch;

mod console;

use console::{print_field_errors, render_table, ConsoleNotifier, PromptConfirm};

/// Interactive commands stay quiet unless asked otherwise.
const INTERACTIVE_LOG_LEVEL: &str = "warn";

#[derive(Parser, Debug)]
#[command(name = "bookshelf", version)]
#[command(about = "Browse and manage a remote book catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// URL of the books collection (overrides `api.base_url`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log filter directive (overrides `telemetry.level`)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Catalog(CatalogCommand),

    /// Run the in-memory development backend
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
}

/// Commands that work against the mounted catalog page.
#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// Show the catalog table
    #[command(alias = "ls")]
    List,

    /// Show one book
    View { id: String },

    /// Add a book
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        /// Publication year
        #[arg(long)]
        year: i32,
        #[arg(long)]
        isbn: String,
        /// Cover image URL
        #[arg(long)]
        image: Option<String>,
    },

    /// Edit a book; fields left out keep their current value
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        isbn: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },

    /// Delete a book
    #[command(alias = "rm")]
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut settings = Settings::load().context("failed to load bookshelf settings")?;
    if let Some(api_url) = cli.api_url {
        settings.api.base_url = api_url;
    }
    match (&cli.log_level, &cli.command) {
        (Some(level), _) => settings.telemetry.level = level.clone(),
        (None, Command::Serve { .. }) => {}
        (None, _) => settings.telemetry.level = INTERACTIVE_LOG_LEVEL.to_string(),
    }
    bookshelf_telemetry::init(&settings.telemetry);

    let command = match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            bookshelf_http::start_server(&settings.server, BookStore::default()).await?;
            return Ok(ExitCode::SUCCESS);
        }
        Command::Catalog(command) => command,
    };

    let client = HttpBooksClient::from_settings(&settings.api)?;
    tracing::debug!(base_url = %client.base_url(), "using books API");

    let page = CatalogPage::new(Arc::new(client), Arc::new(ConsoleNotifier))
        .with_placeholder_cover(settings.ui.placeholder_cover.clone());
    page.mount().await;

    Ok(run(command, &page).await)
}

async fn run(command: CatalogCommand, page: &CatalogPage) -> ExitCode {
    match command {
        CatalogCommand::List => {
            println!("{}", render_table(&page.table()));
            ExitCode::SUCCESS
        }
        CatalogCommand::View { id } => match page.view_dialog(&id) {
            Some(dialog) => {
                println!("{}", dialog.detail());
                ExitCode::SUCCESS
            }
            None => not_listed(&id),
        },
        CatalogCommand::Add {
            title,
            author,
            year,
            isbn,
            image,
        } => {
            let dialog = page.add_dialog();
            dialog.update_draft(|draft| {
                draft.title = title;
                draft.author = author;
                draft.publication_year = year;
                draft.isbn = isbn;
                draft.image = image;
            });
            submitted(dialog.submit().await)
        }
        CatalogCommand::Edit {
            id,
            title,
            author,
            year,
            isbn,
            image,
        } => {
            let Some(dialog) = page.edit_dialog(&id) else {
                return not_listed(&id);
            };
            dialog.apply(BookPatch {
                title,
                author,
                publication_year: year,
                isbn,
                image,
            });
            submitted(dialog.submit().await)
        }
        CatalogCommand::Delete { id, yes } => {
            match page.delete(&id, &PromptConfirm { assume_yes: yes }).await {
                DeleteOutcome::Deleted | DeleteOutcome::Cancelled => ExitCode::SUCCESS,
                DeleteOutcome::Failed => ExitCode::FAILURE,
            }
        }
    }
}

fn submitted(outcome: SubmitOutcome) -> ExitCode {
    match outcome {
        SubmitOutcome::Saved(book) => {
            tracing::debug!(book_id = %book.id, "book saved");
            ExitCode::SUCCESS
        }
        SubmitOutcome::Invalid(errors) => {
            print_field_errors(&errors);
            ExitCode::from(2)
        }
        SubmitOutcome::Failed => ExitCode::FAILURE,
    }
}

fn not_listed(id: &str) -> ExitCode {
    eprintln!("No book with id {id} in the catalog.");
    ExitCode::FAILURE
}
