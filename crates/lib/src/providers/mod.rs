//! # External Service Providers
//!
//! Narrow request/response clients for every collaborator the pipeline talks to:
//! generative models and embeddings (`ai`), media search APIs (`search`) and the
//! vector database (`vector`).

pub mod ai;
pub mod search;
pub mod vector;
