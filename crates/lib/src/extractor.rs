use crate::{
    errors::InsightError,
    types::{DocumentWindow, ExtractedText},
};
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// Pulls the plain text of one page window out of a document.
///
/// Implementations only decode the pages inside the window and report the
/// document's total page count alongside the text.
#[async_trait]
pub trait TextExtractor: Send + Sync + Debug + DynClone {
    async fn extract(
        &self,
        document: &[u8],
        window: DocumentWindow,
    ) -> Result<ExtractedText, InsightError>;
}

dyn_clone::clone_trait_object!(TextExtractor);
