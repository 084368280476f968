//! # Prompt Template Modules
//!
//! This module organizes all prompt templates used by the `pdfinsight` library.

pub mod tasks;
