//! Materia Core Library
//!
//! Formula similarity engine: raw content resolution, ingredient
//! normalization, pairwise scoring, ranking, and a TTL cache for serving
//! lookups against a content store.

pub mod cache;
pub mod config;
pub mod content;
pub mod error;
pub mod format;
pub mod formula;
pub mod logging;
pub mod service;
pub mod similarity;
