//! # API Route Handlers
//!
//! This module organizes all the Axum route handlers for the `pdfinsight-server`.

pub mod general;
pub mod process;
pub mod search;
pub mod upload;

// Re-export all handlers from the sub-modules to make them easily accessible
// to the router under a single `handlers::` path.
pub use general::*;
pub use process::*;
pub use search::*;
pub use upload::*;

// Shared items used by multiple handler modules.
use super::{errors::AppError, state::AppState};
