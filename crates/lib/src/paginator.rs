//! # Pagination
//!
//! Walks a document one fixed-size window at a time. The paginator owns the
//! cursor and only advances it after a window succeeds, so a failed window is
//! retried by calling [`Paginator::load_next`] again.

use crate::{
    errors::InsightError,
    types::{DocumentWindow, Modality, SourceDocument, WindowResults},
};
use async_trait::async_trait;
use tracing::{info, warn};

/// Anything that can produce the results for a document window, in process or
/// over the network.
#[async_trait]
pub trait WindowSource: Send + Sync {
    async fn fetch_window(
        &self,
        document: &SourceDocument,
        window: DocumentWindow,
        modality: Modality,
    ) -> Result<WindowResults, InsightError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationState {
    Idle,
    Loading,
    Presenting,
    Error(String),
    Complete,
}

/// True when a window produced nothing worth presenting, which ends pagination.
pub fn yields_no_content(results: &WindowResults) -> bool {
    results.topics.is_empty() || results.recommendations.is_empty()
}

/// True when `cursor` points beyond the last page of the document.
pub fn past_last_page(cursor: u32, total_pages: u32) -> bool {
    cursor > total_pages
}

#[derive(Debug)]
pub struct Paginator {
    window_size: u32,
    modality: Modality,
    cursor: u32,
    state: PaginationState,
    results: Option<WindowResults>,
}

impl Paginator {
    pub fn new(window_size: u32, modality: Modality) -> Result<Self, InsightError> {
        if window_size == 0 {
            return Err(InsightError::InvalidWindow(
                "window size must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            window_size,
            modality,
            cursor: 1,
            state: PaginationState::Idle,
            results: None,
        })
    }

    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn window_size(&self) -> u32 {
        self.window_size
    }

    pub fn modality(&self) -> Modality {
        self.modality
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    /// Results of the most recent successful window.
    pub fn results(&self) -> Option<&WindowResults> {
        self.results.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.state == PaginationState::Complete
    }

    /// Back to the first page with no results.
    pub fn reset(&mut self) {
        self.cursor = 1;
        self.state = PaginationState::Idle;
        self.results = None;
    }

    /// Fetches the window at the cursor and moves to the next state.
    pub async fn load_next(
        &mut self,
        source: &dyn WindowSource,
        document: &SourceDocument,
    ) -> &PaginationState {
        if self.is_complete() {
            return &self.state;
        }

        let window = match DocumentWindow::new(self.cursor, self.window_size) {
            Ok(window) => window,
            Err(e) => {
                self.state = PaginationState::Error(e.to_string());
                return &self.state;
            }
        };

        self.state = PaginationState::Loading;
        info!("Loading pages {}.", window.page_range());

        match source.fetch_window(document, window, self.modality).await {
            Ok(results) => {
                let empty = yields_no_content(&results);
                let total_pages = results.total_pages;
                self.results = Some(results);
                if empty {
                    info!("Window {} yielded no content.", window.page_range());
                    self.state = PaginationState::Complete;
                } else {
                    self.cursor = self.cursor.saturating_add(self.window_size);
                    self.state = if past_last_page(self.cursor, total_pages) {
                        PaginationState::Complete
                    } else {
                        PaginationState::Presenting
                    };
                }
            }
            Err(e) => {
                warn!("Window {} failed: {e}", window.page_range());
                self.state = PaginationState::Error(e.to_string());
            }
        }

        &self.state
    }
}
