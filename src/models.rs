//! Core data models used throughout docgraph.
//!
//! These types represent the documents, front-matter fields, and extracted
//! links that flow from the parser through the normalizer into the tables.

use std::path::Path;

/// Container format of a candidate document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// Text with an optional `---`-delimited YAML block.
    Delimited,
    /// Jupyter notebook JSON; metadata lives in a raw cell.
    Notebook,
}

impl DocumentFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "qmd" | "md" | "markdown" | "rmd" => Some(Self::Delimited),
            "ipynb" => Some(Self::Notebook),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// A front-matter value that may be written either as a single scalar or
/// as a YAML sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Display form used in the document row: list elements joined with `", "`.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Scalar(s) => s.clone(),
            FieldValue::List(items) => items.join(", "),
        }
    }

    /// Non-empty values that should become edge targets.
    pub fn targets(&self) -> Vec<String> {
        match self {
            FieldValue::Scalar(s) if s.is_empty() => Vec::new(),
            FieldValue::Scalar(s) => vec![s.clone()],
            FieldValue::List(items) => items.iter().filter(|s| !s.is_empty()).cloned().collect(),
        }
    }
}

/// A `[name](url)` link found in a document description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLink {
    pub name: String,
    pub url: String,
}

/// Normalized document row. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub file_index: String,
    pub doc_site: String,
    pub file_name: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub categories: String,
    pub date: String,
}

/// Everything the table builder needs from one successfully parsed document.
#[derive(Debug, Clone)]
pub struct NormalizedDocument {
    pub document: Document,
    pub categories: Vec<String>,
    pub authors: Vec<String>,
    pub links: Vec<SourceLink>,
}
