//! Extracts topics from a text file and prints the search queries generated for them.
//!
//! ```sh
//! GOOGLE_AI_API_KEY=... cargo run -p pdfinsight --example topics -- notes.txt videos
//! ```

use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use pdfinsight::{
    constants::DEFAULT_GENERATION_MODEL,
    providers::ai::{gemini::GeminiProvider, local::LocalAiProvider, AiProvider},
    recommend::{extract_topics, generate_queries},
    Modality,
};
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenv().ok();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <text-file> [videos|pics|gifs]", args[0]);
        return Ok(());
    }
    let text = std::fs::read_to_string(&args[1])
        .with_context(|| format!("Failed to read '{}'", args[1]))?;
    let modality: Modality = args.get(2).map(String::as_str).unwrap_or("videos").parse()?;

    // --- Build AI Provider ---
    let provider_name = env::var("AI_PROVIDER").unwrap_or_else(|_| "gemini".to_string());
    let ai_provider: Box<dyn AiProvider> = match provider_name.as_str() {
        "gemini" => {
            let key = env::var("GOOGLE_AI_API_KEY").context("GOOGLE_AI_API_KEY is not set")?;
            let url = env::var("AI_API_URL")
                .unwrap_or_else(|_| GeminiProvider::url_for_model(DEFAULT_GENERATION_MODEL));
            Box::new(GeminiProvider::new(url, key)?)
        }
        "local" => {
            let url = env::var("AI_API_URL").context("AI_API_URL is not set")?;
            Box::new(LocalAiProvider::new(
                url,
                env::var("AI_API_KEY").ok(),
                env::var("AI_MODEL").ok(),
            )?)
        }
        other => bail!("Unsupported AI provider: {other}"),
    };

    let topics = extract_topics(ai_provider.as_ref(), &text).await;
    println!("Topics:");
    for topic in &topics {
        println!("  - {topic}");
    }

    let queries = generate_queries(ai_provider.as_ref(), &topics, modality).await?;
    println!("{modality} queries:");
    for query in &queries {
        println!("  - {query}");
    }

    Ok(())
}
