//! # Core Data Types
//!
//! Shared value types passed between the extractor, the providers, the window
//! pipeline and the paginator.

use crate::errors::InsightError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A contiguous page range of the source document, processed in one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentWindow {
    start_page: u32,
    page_count: u32,
}

impl DocumentWindow {
    /// Creates a window. Both `start_page` and `page_count` are 1-based and must be at least 1.
    pub fn new(start_page: u32, page_count: u32) -> Result<Self, InsightError> {
        if start_page == 0 {
            return Err(InsightError::InvalidWindow(
                "startPage must be at least 1".to_string(),
            ));
        }
        if page_count == 0 {
            return Err(InsightError::InvalidWindow(
                "pageCount must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            start_page,
            page_count,
        })
    }

    pub fn start_page(&self) -> u32 {
        self.start_page
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// The last page (inclusive) covered by this window.
    pub fn end_page(&self) -> u32 {
        self.start_page.saturating_add(self.page_count.saturating_sub(1))
    }

    /// `"start"` for a single page, `"start-end"` otherwise.
    pub fn page_range(&self) -> String {
        if self.page_count == 1 {
            self.start_page.to_string()
        } else {
            format!("{}-{}", self.start_page, self.end_page())
        }
    }

    /// Whether the 1-based `page` falls inside this window.
    pub fn contains(&self, page: u32) -> bool {
        page >= self.start_page && page <= self.end_page()
    }
}

/// Raw document bytes held by the caller. Nothing is persisted server-side.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// The recommendation type requested for a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Videos,
    Pics,
    Gifs,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Videos => "videos",
            Modality::Pics => "pics",
            Modality::Gifs => "gifs",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Modality {
    type Err = InsightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "videos" => Ok(Modality::Videos),
            "pics" => Ok(Modality::Pics),
            "gifs" => Ok(Modality::Gifs),
            other => Err(InsightError::Configuration(format!(
                "Unsupported recommendation type '{other}'. Expected 'videos', 'pics' or 'gifs'."
            ))),
        }
    }
}

/// A single video returned by the video search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub channel_title: String,
}

/// A single animated image returned by the gif search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gif {
    pub id: String,
    pub title: String,
    pub url: String,
    pub preview: String,
}

/// Provider results, one inner list per recommendation (index-aligned).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaResults {
    Videos(Vec<Vec<Video>>),
    Gifs(Vec<Vec<Gif>>),
}

impl MediaResults {
    /// Number of result sets, which matches the number of recommendations.
    pub fn len(&self) -> usize {
        match self {
            MediaResults::Videos(sets) => sets.len(),
            MediaResults::Gifs(sets) => sets.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decodes a JSON result set for a known modality.
    ///
    /// The untagged representation cannot tell an all-empty gif set from an
    /// all-empty video set, so callers that know the modality use this instead.
    pub fn from_value(
        modality: Modality,
        value: serde_json::Value,
    ) -> Result<Option<Self>, serde_json::Error> {
        match modality {
            Modality::Videos => Ok(Some(MediaResults::Videos(serde_json::from_value(value)?))),
            Modality::Gifs => Ok(Some(MediaResults::Gifs(serde_json::from_value(value)?))),
            Modality::Pics => Ok(None),
        }
    }
}

/// Text extracted from one window, along with the document's total page count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedText {
    pub text: String,
    pub total_pages: u32,
}

/// Everything produced for one processed window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowResults {
    pub page_range: String,
    pub total_pages: u32,
    pub topics: Vec<String>,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<MediaResults>,
}
