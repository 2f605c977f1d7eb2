//! Command handlers. Everything a command prints goes to standard output;
//! logs go to standard error.

use crate::error::{ErrorKind, Result};
use crate::{Cli, Command};
use exn::{OptionExt, ResultExt};
use futures::StreamExt;
use panels_cache::{CatalogEntry, Database, Page, Repository, Search, Sort};
use panels_config::Config;
use panels_library::error::ErrorKind as LibraryErrorKind;
use panels_library::import::ImportEvent;
use panels_library::{Context, import, reader, recompress};
use panels_transcode::Encoding;
use panels_transcode::cli::Preference;
use std::io::Write;
use std::path::{Path, PathBuf};

pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    let db = Database::connect(&config.database).await.or_raise(|| ErrorKind::Catalog)?;
    let result = dispatch(&config, &db, cli.command).await;
    db.close().await;
    result
}

async fn dispatch(config: &Config, db: &Database, command: Command) -> Result<()> {
    let repo = Repository::from(db);
    match command {
        Command::Init => {
            let count = repo.count().await.or_raise(|| ErrorKind::Catalog)?;
            println!("catalog ready at {} ({count} comics)", config.database.display());
        },
        Command::Import { root, dry_run } => {
            let repo = Repository::new(db.pool().clone(), dry_run);
            import_collection(config, &repo, root).await?;
        },
        Command::Search { page, limit, library, keywords, sort_by, sort_type, history } => {
            let search = Search {
                page: Page::numbered(page, limit.unwrap_or(config.search.page_size)),
                library_only: library,
                keywords,
                sort: Sort::new(
                    sort_by.unwrap_or_else(|| config.search.sort_by.clone()),
                    sort_type.unwrap_or_else(|| config.search.sort_direction.clone()),
                ),
            };
            for entry in repo.search(&search).await.or_raise(|| ErrorKind::Catalog)? {
                print_entry(&entry);
            }
            if history && repo.advance_if_sequential(page).await.or_raise(|| ErrorKind::Catalog)? {
                tracing::debug!(page, "last visited page advanced");
            }
        },
        Command::Show { id } => {
            let entry = repo.get_by_id(&id).await.or_raise(|| ErrorKind::Catalog)?;
            let entry = entry.ok_or_raise(|| ErrorKind::NotFound(id))?;
            println!("id:        {}", entry.comic.id);
            println!("title:     {}", entry.comic.metadata.title);
            println!("artist:    {}", entry.comic.metadata.artist);
            println!("book:      {}", entry.comic.metadata.book);
            println!("modified:  {}", entry.comic.modified_at);
            println!("imported:  {}", entry.comic.imported_at);
            println!("path:      {}", entry.comic.path.display());
            println!("library:   {}", if entry.bookmarked { "yes" } else { "no" });
        },
        Command::Pages { id } => {
            for name in reader::pages(&repo, &id).await.or_raise(|| ErrorKind::Library)? {
                println!("{name}");
            }
        },
        Command::Page { id, entry, output } => {
            let bytes = reader::page(&repo, &id, &entry).await.or_raise(|| ErrorKind::Library)?;
            let bytes = bytes.ok_or_raise(|| ErrorKind::EntryNotFound(id, entry))?;
            emit(&bytes, output.as_deref())?;
        },
        Command::Cover { id, output } => {
            let bytes = reader::cover(&repo, &id).await.or_raise(|| ErrorKind::Library)?;
            emit(&bytes, output.as_deref())?;
        },
        Command::Bookmark { id, remove } => {
            if repo.get_by_id(&id).await.or_raise(|| ErrorKind::Catalog)?.is_none() {
                exn::bail!(ErrorKind::NotFound(id));
            }
            repo.set_bookmark(&id, !remove).await.or_raise(|| ErrorKind::Catalog)?;
        },
        Command::Progress => {
            println!("{}", repo.last_visited_page().await.or_raise(|| ErrorKind::Catalog)?);
        },
        Command::Recompress { root, output, encoding } => {
            recompress_collection(config, root, output, encoding).await?;
        },
    }
    Ok(())
}

fn print_entry(entry: &CatalogEntry) {
    let marker = if entry.bookmarked { "*" } else { " " };
    let comic = &entry.comic;
    println!(
        "{marker} {}\t[{}] {} ({})",
        comic.id, comic.metadata.artist, comic.metadata.title, comic.metadata.book
    );
}

fn emit(bytes: &[u8], output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, bytes).or_raise(|| ErrorKind::Output(path.to_path_buf())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes).and_then(|()| stdout.flush()).or_raise(|| ErrorKind::Output(PathBuf::from("-")))
        },
    }
}

async fn import_collection(config: &Config, repo: &Repository, root: PathBuf) -> Result<()> {
    let ctx = Context::new(config.encoding().or_raise(|| ErrorKind::Config)?, config.import.concurrency);
    let mut events = std::pin::pin!(import::import(repo, root, &ctx));
    while let Some(event) = events.next().await {
        match event {
            Ok(ImportEvent::Started) => {},
            Ok(ImportEvent::Imported(comic)) => println!("imported {}", comic.id),
            Ok(ImportEvent::AlreadyCataloged(comic)) => println!("already cataloged {}", comic.id),
            Ok(ImportEvent::Skipped { path, .. }) => println!("skipped {}", path.display()),
            Ok(ImportEvent::Complete(summary)) => println!(
                "discovered {}, imported {}, already cataloged {}, skipped {}{}",
                summary.discovered,
                summary.imported,
                summary.already_cataloged,
                summary.skipped,
                if repo.is_dry_run() { " (dry run)" } else { "" },
            ),
            // Unreadable directories are logged by the walk; keep going.
            Err(e) if matches!(*e, LibraryErrorKind::Scan) => {},
            Err(e) => return Err(e).or_raise(|| ErrorKind::Library),
        }
    }
    Ok(())
}

async fn recompress_collection(
    config: &Config,
    root: PathBuf,
    output: PathBuf,
    encoding: Option<Option<String>>,
) -> Result<()> {
    let preference = Preference::try_from(encoding).or_raise(|| ErrorKind::Usage)?;
    let configured = config.encoding().or_raise(|| ErrorKind::Config)?;
    let ctx = Context::new(preference.resolve(&configured, Encoding::Lossless), config.import.concurrency);
    let summary = recompress::recompress(root, output, &ctx).await.or_raise(|| ErrorKind::Library)?;
    println!(
        "recompressed {} archives ({} pages re-encoded, {} copied), {} failed",
        summary.archives, summary.pages_reencoded, summary.pages_copied, summary.failed
    );
    Ok(())
}
