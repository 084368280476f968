//! # Default Task Prompts
//!
//! The hardcoded instructions sent to the generative model for each task.
//! User prompts carry the placeholders `{text}` or `{topics}`.

// --- Topic Extraction ---
pub const TOPIC_EXTRACTION_SYSTEM_PROMPT: &str = r#"Extract the 5 most important topics or concepts from the text provided by the user.
Return them as a JSON array of strings, nothing else."#;

pub const TOPIC_EXTRACTION_USER_PROMPT: &str = r#"Text: {text}"#;

// --- Video Query Generation ---
pub const VIDEO_QUERY_SYSTEM_PROMPT: &str = r#"Generate YouTube search queries for the topics provided by the user. For each topic, create one search query
that would yield high-quality educational content. Return them as a JSON array of strings, nothing else."#;

// --- Image Query Generation ---
pub const IMAGE_QUERY_SYSTEM_PROMPT: &str = r#"Generate image search queries for the topics provided by the user. For each topic, create one
specific search query that would yield informative and relevant images.
Return them as a JSON array of strings, nothing else."#;

pub const QUERY_GENERATION_USER_PROMPT: &str = r#"Topics: {topics}"#;
