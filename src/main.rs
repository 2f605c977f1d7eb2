mod commands;
mod error;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "panels", version, about = "Catalog a comic archive collection into a searchable index")]
struct Cli {
    /// Configuration file (TOML, YAML or JSON) layered over the user's own.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Increase logging verbosity (repeatable). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the catalog (or bring an existing one up to date).
    Init,
    /// Catalog every archive under a directory.
    Import {
        root: PathBuf,
        /// Inspect archives and report what would be cataloged without writing.
        #[arg(long)]
        dry_run: bool,
    },
    /// List one page of the catalog.
    Search {
        /// Zero-based page number.
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// Entries per page (defaults to `search.page_size`).
        #[arg(long)]
        limit: Option<u32>,
        /// Only list bookmarked comics.
        #[arg(long)]
        library: bool,
        /// Case-insensitive text matched against artist, title or book.
        #[arg(long)]
        keywords: Option<String>,
        /// Column to sort by (defaults to `search.sort_by`).
        #[arg(long)]
        sort_by: Option<String>,
        /// `ASC` or `DESC` (defaults to `search.sort_direction`).
        #[arg(long)]
        sort_type: Option<String>,
        /// Record this page as the last visited one, if it follows on from it.
        #[arg(long)]
        history: bool,
    },
    /// Show a single comic.
    Show { id: String },
    /// List the entries of a comic's archive.
    Pages { id: String },
    /// Extract one entry of a comic's archive.
    Page {
        id: String,
        entry: String,
        /// Write to this file instead of standard output.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Extract a comic's stored cover.
    Cover {
        id: String,
        /// Write to this file instead of standard output.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Add a comic to the library (or take it out again).
    Bookmark {
        id: String,
        #[arg(long)]
        remove: bool,
    },
    /// Show the last visited page.
    Progress,
    /// Write re-encoded copies of every archive under a directory.
    Recompress {
        root: PathBuf,
        /// Directory the copies are written to.
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
        /// `lossless`, `lossy` or `lossy:<quality>`. A bare flag uses the
        /// configured cover encoding; without the flag pages are lossless.
        #[arg(long, num_args = 0..=1, require_equals = true)]
        encoding: Option<Option<String>>,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    // Standard output is reserved for command output (including raw images).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:?}");
            ExitCode::FAILURE
        },
    }
}
