//! # `pdfinsight-cli` Library Crate
//!
//! Command-line client for `pdfinsight-server`. `upload` checks that a file is
//! accepted; `walk` pages through a document window by window, printing the
//! topics and media recommended for each one.

pub mod api_client;

pub use api_client::{ApiClient, UploadResponse, DEFAULT_SERVER_URL};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use pdfinsight::{
    yields_no_content, MediaResults, Modality, PaginationState, Paginator, SourceDocument,
    WindowResults, WindowSource,
};
use std::path::{Path, PathBuf};
use tracing::info;

// --- CLI Argument Structs ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base URL of the pdfinsight server.
    #[arg(long, global = true, env = "PDFINSIGHT_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server: String,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a PDF and print what the server received
    Upload(UploadArgs),
    /// Walk a PDF window by window and print recommendations
    Walk(WalkArgs),
}

#[derive(Parser, Debug)]
pub struct UploadArgs {
    /// Path to the PDF file.
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
pub struct WalkArgs {
    /// Path to the PDF file.
    pub file: PathBuf,
    /// Recommendation type: videos, pics or gifs.
    #[arg(long = "type", value_parser = parse_modality)]
    pub modality: Modality,
    /// Pages per window.
    #[arg(long, default_value_t = 10)]
    pub window: u32,
    /// Stop after this many windows.
    #[arg(long)]
    pub max_windows: Option<usize>,
}

fn parse_modality(value: &str) -> Result<Modality, String> {
    value.parse::<Modality>().map_err(|e| e.to_string())
}

/// What a walk produced before it stopped.
#[derive(Debug)]
pub struct WalkOutcome {
    pub windows: Vec<WindowResults>,
    pub final_state: PaginationState,
}

/// Loads windows until the paginator completes, fails, or `max_windows` is reached.
pub async fn walk_document(
    source: &dyn WindowSource,
    document: &SourceDocument,
    paginator: &mut Paginator,
    max_windows: Option<usize>,
) -> WalkOutcome {
    let mut windows = Vec::new();
    let mut loaded = 0usize;

    loop {
        if paginator.is_complete() || max_windows.is_some_and(|max| loaded >= max) {
            break;
        }
        let state = paginator.load_next(source, document).await.clone();
        loaded += 1;

        if !matches!(state, PaginationState::Error(_)) {
            if let Some(results) = paginator.results() {
                if !yields_no_content(results) {
                    windows.push(results.clone());
                }
            }
        }

        if matches!(state, PaginationState::Complete | PaginationState::Error(_)) {
            break;
        }
    }

    WalkOutcome {
        windows,
        final_state: paginator.state().clone(),
    }
}

async fn read_document(path: &Path) -> Result<SourceDocument> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string());
    Ok(SourceDocument::new(file_name, bytes))
}

/// Renders one window as plain text.
pub fn format_window(results: &WindowResults) -> String {
    let mut out = format!(
        "Pages {} of {}\n  Topics: {}\n",
        results.page_range,
        results.total_pages,
        results.topics.join(", ")
    );
    for (i, recommendation) in results.recommendations.iter().enumerate() {
        out.push_str(&format!("  [{}] {recommendation}\n", i + 1));
        match &results.results {
            Some(MediaResults::Videos(sets)) => {
                for video in sets.get(i).into_iter().flatten() {
                    out.push_str(&format!(
                        "      https://www.youtube.com/watch?v={} {} ({})\n",
                        video.id, video.title, video.channel_title
                    ));
                }
            }
            Some(MediaResults::Gifs(sets)) => {
                for gif in sets.get(i).into_iter().flatten() {
                    out.push_str(&format!("      {} {}\n", gif.url, gif.title));
                }
            }
            None => {}
        }
    }
    out
}

// --- Main Logic ---

pub async fn run(cli: Cli) -> Result<()> {
    let client = ApiClient::new(cli.server);

    match cli.command {
        Commands::Upload(args) => {
            let document = read_document(&args.file).await?;
            let response = client.upload(&document).await?;
            println!(
                "{}: {} ({} bytes)",
                response.message, response.file_name, response.file_size
            );
        }
        Commands::Walk(args) => {
            let document = read_document(&args.file).await?;
            let mut paginator = Paginator::new(args.window, args.modality)?;
            info!(
                "Walking '{}' in windows of {} pages via {}.",
                document.file_name,
                args.window,
                client.base_url()
            );

            let outcome = walk_document(&client, &document, &mut paginator, args.max_windows).await;
            for results in &outcome.windows {
                println!("{}", format_window(results));
            }

            if let PaginationState::Error(message) = outcome.final_state {
                return Err(anyhow!(message));
            }
        }
    }

    Ok(())
}
