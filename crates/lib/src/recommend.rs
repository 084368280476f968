//! # Topic and Query Generation
//!
//! Turns window text into topics, and topics into one search query each, by
//! prompting the generative model and parsing its loosely formatted replies.

use crate::{
    constants::FALLBACK_TOPICS,
    errors::PromptError,
    prompts::tasks::{
        IMAGE_QUERY_SYSTEM_PROMPT, QUERY_GENERATION_USER_PROMPT, TOPIC_EXTRACTION_SYSTEM_PROMPT,
        TOPIC_EXTRACTION_USER_PROMPT, VIDEO_QUERY_SYSTEM_PROMPT,
    },
    providers::ai::AiProvider,
    types::Modality,
};
use regex::Regex;
use thiserror::Error;
use tracing::{debug, info, warn};

/// A model reply that could not be turned into a list of strings.
#[derive(Error, Debug)]
pub enum ModelOutputError {
    #[error("Model reply is not a JSON array of strings: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("No quoted strings found in model reply")]
    NothingSalvaged,
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Strips code fences and newlines from a model reply.
pub fn clean_model_output(raw: &str) -> String {
    raw.replace("```json", "")
        .replace("```", "")
        .replace('\n', "")
        .trim()
        .to_string()
}

/// Parses a cleaned topic reply.
///
/// Bracketed replies must be a valid JSON array. Anything else is salvaged by
/// collecting every double-quoted substring.
pub fn parse_topics(cleaned: &str) -> Result<Vec<String>, ModelOutputError> {
    if cleaned.starts_with('[') && cleaned.ends_with(']') {
        return Ok(serde_json::from_str(cleaned)?);
    }

    let re = Regex::new(r#""([^"]+)""#)?;
    let salvaged: Vec<String> = re
        .captures_iter(cleaned)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect();

    if salvaged.is_empty() {
        Err(ModelOutputError::NothingSalvaged)
    } else {
        Ok(salvaged)
    }
}

/// Parses a cleaned query reply. No salvage is attempted.
pub fn parse_queries(cleaned: &str) -> Result<Vec<String>, ModelOutputError> {
    Ok(serde_json::from_str(cleaned)?)
}

fn fallback_topics() -> Vec<String> {
    FALLBACK_TOPICS.iter().map(|t| t.to_string()).collect()
}

/// Asks the model for the five most important topics in `text`.
///
/// Never fails: an unusable reply or a failed model call yields the fallback
/// topics. A valid empty array is returned as-is.
pub async fn extract_topics(ai_provider: &dyn AiProvider, text: &str) -> Vec<String> {
    let user_prompt = TOPIC_EXTRACTION_USER_PROMPT.replace("{text}", text);
    let raw = match ai_provider
        .generate(TOPIC_EXTRACTION_SYSTEM_PROMPT, &user_prompt)
        .await
    {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Topic extraction call failed, using fallback topics: {e}");
            return fallback_topics();
        }
    };

    let cleaned = clean_model_output(&raw);
    debug!("Cleaned topic reply: {cleaned}");
    match parse_topics(&cleaned) {
        Ok(topics) => {
            info!("Extracted {} topics.", topics.len());
            topics
        }
        Err(e) => {
            warn!("{e}. Using fallback topics.");
            fallback_topics()
        }
    }
}

/// Asks the model for one search query per topic, tuned to the modality.
///
/// A reply that does not parse yields no queries. A failed model call is
/// returned to the caller.
pub async fn generate_queries(
    ai_provider: &dyn AiProvider,
    topics: &[String],
    modality: Modality,
) -> Result<Vec<String>, PromptError> {
    let system_prompt = match modality {
        Modality::Videos => VIDEO_QUERY_SYSTEM_PROMPT,
        Modality::Pics | Modality::Gifs => IMAGE_QUERY_SYSTEM_PROMPT,
    };
    let user_prompt = QUERY_GENERATION_USER_PROMPT.replace("{topics}", &topics.join(", "));

    let raw = ai_provider.generate(system_prompt, &user_prompt).await?;
    let cleaned = clean_model_output(&raw);

    match parse_queries(&cleaned) {
        Ok(queries) => {
            info!("Generated {} {modality} queries.", queries.len());
            Ok(queries)
        }
        Err(e) => {
            warn!("{e}. Returning no {modality} queries.");
            Ok(Vec::new())
        }
    }
}
