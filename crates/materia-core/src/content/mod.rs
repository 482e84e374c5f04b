//! Content sources for the formula pool
//!
//! The content store is external; a source only has to hand back the full
//! pool of formulas with ingredients resolved.

mod http;

pub use http::{HttpSource, DEFAULT_TIMEOUT_SECONDS};

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MateriaError, Result};
use crate::formula::{parse_formula_pool, Formula};

/// Anything that can produce the candidate formula pool
pub trait FormulaSource: Send + Sync {
    /// Short description for logs and error messages
    fn describe(&self) -> String;

    /// Fetch every formula with its ingredients
    fn fetch_formulas(&self) -> Result<Vec<Formula>>;
}

/// Formula pool stored as a JSON document on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FormulaSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch_formulas(&self) -> Result<Vec<Formula>> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            MateriaError::content_unavailable(&self.describe(), e)
        })?;
        parse_formula_pool(&content, &self.describe())
    }
}

/// Fixed in-memory pool
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    formulas: Vec<Formula>,
}

impl MemorySource {
    pub fn new(formulas: Vec<Formula>) -> Self {
        Self { formulas }
    }
}

impl FormulaSource for MemorySource {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn fetch_formulas(&self) -> Result<Vec<Formula>> {
        Ok(self.formulas.clone())
    }
}
