//! # pdfinsight: command-line client
//!
//! Thin entrypoint. All logic lives in the `pdfinsight_cli` library crate.

use anyhow::Result;
use clap::Parser;
use pdfinsight_cli::{run, Cli};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // 1. Setup logging
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("pdfinsight_cli=info".parse()?),
        )
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Run
    if let Err(e) = run(cli).await {
        eprintln!("[pdfinsight error] Failed to execute command: {e:?}");
        std::process::exit(1);
    }

    Ok(())
}
