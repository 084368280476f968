//! # Shared Constants
//!
//! Default endpoints, model names and limits shared by the library, the server
//! and the CLI.

/// Topics returned when the model reply cannot be used at all.
pub const FALLBACK_TOPICS: [&str; 5] = [
    "General knowledge",
    "Education",
    "Information",
    "Learning",
    "Reading",
];

/// Results requested from each search provider per query.
pub const MAX_RESULTS_PER_QUERY: usize = 3;

/// GIPHY rejects long URLs (414), so queries are cut to this many characters.
pub const GIF_QUERY_MAX_CHARS: usize = 100;

pub const DEFAULT_GENERATION_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub const YOUTUBE_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
pub const GIPHY_SEARCH_URL: &str = "https://api.giphy.com/v1/gifs/search";

pub const PINECONE_CONTROL_PLANE_URL: &str = "https://api.pinecone.io";
pub const PINECONE_API_VERSION: &str = "2024-07";

/// Prefix for vector record ids; the page range is appended.
pub const VECTOR_ID_PREFIX: &str = "pdf-";
