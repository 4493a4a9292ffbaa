//! Front-matter extraction for delimited-text documents and notebooks.
//!
//! Both container formats carry a YAML block fenced by `---` lines. For text
//! documents the block sits between the first two fence lines; for notebooks
//! it is the first raw cell containing a fence. The parsed block is exposed
//! as a [`FrontMatter`] whose known fields are read as [`FieldValue`]s.

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::error::DocumentError;
use crate::models::{DocumentFormat, FieldValue};

const DELIMITER: &str = "---";

/// Parsed front-matter mapping of one document.
#[derive(Debug, Clone)]
pub struct FrontMatter {
    fields: Mapping,
}

impl FrontMatter {
    /// Read a field as a scalar-or-list value. `null` and missing keys are
    /// both `None`.
    pub fn field(&self, key: &str) -> Result<Option<FieldValue>, DocumentError> {
        match self.fields.get(key) {
            None => Ok(None),
            Some(value) => field_value(key, value),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.fields.len()
    }
}

/// Extract front-matter from a document's raw contents.
///
/// Returns `Ok(None)` when the document has no metadata block (or the block
/// is empty) and `Err` when a block exists but cannot be parsed.
pub fn parse_front_matter(
    contents: &str,
    format: DocumentFormat,
) -> Result<Option<FrontMatter>, DocumentError> {
    let contents = contents.trim_start_matches('\u{feff}');
    let block = match format {
        DocumentFormat::Delimited => delimited_block(contents),
        DocumentFormat::Notebook => notebook_block(contents)?,
    };

    match block {
        Some(yaml) => parse_yaml_block(&yaml),
        None => Ok(None),
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches(['\r', '\n']) == DELIMITER
}

/// Text between the first and second fence line, or `None` if there are
/// fewer than two fences.
fn delimited_block(contents: &str) -> Option<String> {
    let mut lines = contents.lines();
    lines.by_ref().find(|line| is_delimiter(line))?;

    let mut block: Vec<&str> = Vec::new();
    for line in lines {
        if is_delimiter(line) {
            return Some(block.join("\n"));
        }
        block.push(line);
    }
    None
}

#[derive(Deserialize)]
struct Notebook {
    cells: Vec<Cell>,
}

#[derive(Deserialize)]
struct Cell {
    cell_type: String,
    #[serde(default)]
    source: CellSource,
}

/// nbformat allows cell source as a list of lines or as one string.
#[derive(Deserialize)]
#[serde(untagged)]
enum CellSource {
    Lines(Vec<String>),
    Text(String),
}

impl Default for CellSource {
    fn default() -> Self {
        CellSource::Lines(Vec::new())
    }
}

impl CellSource {
    fn lines(&self) -> Vec<&str> {
        match self {
            CellSource::Lines(lines) => lines.iter().map(String::as_str).collect(),
            CellSource::Text(text) => text.split_inclusive('\n').collect(),
        }
    }
}

/// Source of the first raw cell that contains a fence line, with the fence
/// lines removed.
fn notebook_block(contents: &str) -> Result<Option<String>, DocumentError> {
    let notebook: Notebook =
        serde_json::from_str(contents).map_err(|e| DocumentError::Notebook(e.to_string()))?;

    for cell in &notebook.cells {
        if cell.cell_type != "raw" {
            continue;
        }
        let lines = cell.source.lines();
        if !lines.iter().any(|line| is_delimiter(line)) {
            continue;
        }
        let yaml: String = lines
            .into_iter()
            .filter(|line| line.trim() != DELIMITER)
            .collect();
        return Ok(Some(yaml));
    }

    Ok(None)
}

fn parse_yaml_block(yaml: &str) -> Result<Option<FrontMatter>, DocumentError> {
    if yaml.trim().is_empty() {
        return Ok(None);
    }

    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Null => Ok(None),
        Value::Mapping(fields) if fields.is_empty() => Ok(None),
        Value::Mapping(fields) => Ok(Some(FrontMatter { fields })),
        _ => Err(DocumentError::NotAMapping),
    }
}

fn field_value(key: &str, value: &Value) -> Result<Option<FieldValue>, DocumentError> {
    match value {
        Value::Null => Ok(None),
        Value::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match scalar_text(item) {
                    Some(Some(text)) => out.push(text),
                    Some(None) => {}
                    None => return Err(invalid(key, "nested value inside list")),
                }
            }
            Ok(Some(FieldValue::List(out)))
        }
        Value::Tagged(tagged) => field_value(key, &tagged.value),
        other => match scalar_text(other) {
            Some(text) => Ok(text.map(FieldValue::Scalar)),
            None => Err(invalid(key, "expected a string or a list of strings")),
        },
    }
}

/// Textual form of a YAML scalar. The outer `None` means "not a scalar",
/// the inner one means `null`.
fn scalar_text(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::Bool(b) => Some(Some(b.to_string())),
        Value::Number(n) => Some(Some(n.to_string())),
        Value::String(s) => Some(Some(s.clone())),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn invalid(key: &str, reason: &str) -> DocumentError {
    DocumentError::InvalidField {
        field: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delimited(input: &str) -> Option<FrontMatter> {
        parse_front_matter(input, DocumentFormat::Delimited).unwrap()
    }

    #[test]
    fn test_basic_block() {
        let fm = delimited("---\ntitle: Intro\ndate: 2024-01-02\n---\n# Body\n").unwrap();
        assert_eq!(
            fm.field("title").unwrap(),
            Some(FieldValue::Scalar("Intro".into()))
        );
        assert_eq!(
            fm.field("date").unwrap(),
            Some(FieldValue::Scalar("2024-01-02".into()))
        );
        assert_eq!(fm.field("author").unwrap(), None);
    }

    #[test]
    fn test_list_field() {
        let fm = delimited("---\nauthor: [Jane Doe, John Roe]\n---\n").unwrap();
        assert_eq!(
            fm.field("author").unwrap(),
            Some(FieldValue::List(vec!["Jane Doe".into(), "John Roe".into()]))
        );
    }

    #[test]
    fn test_single_delimiter_is_not_metadata() {
        assert!(delimited("---\ntitle: Intro\nno closing fence\n").is_none());
        assert!(delimited("# Just a heading\n\nBody text.").is_none());
    }

    #[test]
    fn test_block_after_leading_text() {
        let fm = delimited("preamble\n---\ntitle: Late\n---\nbody").unwrap();
        assert_eq!(
            fm.field("title").unwrap(),
            Some(FieldValue::Scalar("Late".into()))
        );
    }

    #[test]
    fn test_crlf_and_bom() {
        let fm = delimited("\u{feff}---\r\ntitle: Win\r\n---\r\nbody").unwrap();
        assert_eq!(
            fm.field("title").unwrap(),
            Some(FieldValue::Scalar("Win".into()))
        );
    }

    #[test]
    fn test_indented_fence_is_not_a_delimiter() {
        assert!(delimited(" ---\ntitle: x\n ---\n").is_none());
    }

    #[test]
    fn test_empty_block_is_not_metadata() {
        assert!(delimited("---\n---\nbody").is_none());
        assert!(delimited("---\n{}\n---\nbody").is_none());
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        let err = parse_front_matter("---\ntitle: [unclosed\n---\n", DocumentFormat::Delimited)
            .unwrap_err();
        assert!(matches!(err, DocumentError::Yaml(_)));
    }

    #[test]
    fn test_non_mapping_is_error() {
        let err = parse_front_matter("---\n- a\n- b\n---\n", DocumentFormat::Delimited)
            .unwrap_err();
        assert!(matches!(err, DocumentError::NotAMapping));
    }

    #[test]
    fn test_scalar_kinds_render_as_text() {
        let fm = delimited("---\ntitle: 42\ndraft: true\nauthor: ~\n---\n").unwrap();
        assert_eq!(
            fm.field("title").unwrap(),
            Some(FieldValue::Scalar("42".into()))
        );
        assert_eq!(
            fm.field("draft").unwrap(),
            Some(FieldValue::Scalar("true".into()))
        );
        assert_eq!(fm.field("author").unwrap(), None);
    }

    #[test]
    fn test_yaml_1_2_booleans() {
        let fm = delimited("---\ntitle: yes\ndraft: True\n---\n").unwrap();
        assert_eq!(
            fm.field("title").unwrap(),
            Some(FieldValue::Scalar("yes".into()))
        );
        assert_eq!(
            fm.field("draft").unwrap(),
            Some(FieldValue::Scalar("true".into()))
        );
    }

    #[test]
    fn test_duplicate_key_is_error() {
        let err = parse_front_matter("---\ntitle: a\ntitle: b\n---\n", DocumentFormat::Delimited)
            .unwrap_err();
        assert!(matches!(err, DocumentError::Yaml(_)));
        assert!(err.to_string().contains("title"), "{}", err);
    }

    #[test]
    fn test_nested_mapping_field_is_invalid() {
        let fm = delimited("---\nauthor:\n  name: Jane\n---\n").unwrap();
        let err = fm.field("author").unwrap_err();
        assert!(matches!(err, DocumentError::InvalidField { .. }));
        // Unknown nested fields are fine as long as nobody reads them.
        let fm = delimited("---\ntitle: x\nformat:\n  html:\n    toc: true\n---\n").unwrap();
        assert_eq!(fm.len(), 2);
    }

    #[test]
    fn test_notebook_raw_cell_lines() {
        let nb = r#"{
            "cells": [
                {"cell_type": "markdown", "source": ["---\n", "title: Wrong\n", "---"]},
                {"cell_type": "raw", "source": ["---\n", "title: Notebook\n", "categories: [a, b]\n", "---"]},
                {"cell_type": "raw", "source": ["---\n", "title: Later\n", "---"]}
            ]
        }"#;
        let fm = parse_front_matter(nb, DocumentFormat::Notebook)
            .unwrap()
            .unwrap();
        assert_eq!(
            fm.field("title").unwrap(),
            Some(FieldValue::Scalar("Notebook".into()))
        );
        assert_eq!(
            fm.field("categories").unwrap(),
            Some(FieldValue::List(vec!["a".into(), "b".into()]))
        );
    }

    #[test]
    fn test_notebook_string_source() {
        let nb = r#"{"cells": [{"cell_type": "raw", "source": "---\ntitle: Text\n---\n"}]}"#;
        let fm = parse_front_matter(nb, DocumentFormat::Notebook)
            .unwrap()
            .unwrap();
        assert_eq!(
            fm.field("title").unwrap(),
            Some(FieldValue::Scalar("Text".into()))
        );
    }

    #[test]
    fn test_notebook_without_raw_cell() {
        let nb = r#"{"cells": [{"cell_type": "code", "source": ["print('---')"]}]}"#;
        assert!(parse_front_matter(nb, DocumentFormat::Notebook)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_raw_cell_without_fence_is_skipped() {
        let nb = r#"{"cells": [{"cell_type": "raw", "source": ["title: no fence"]}]}"#;
        assert!(parse_front_matter(nb, DocumentFormat::Notebook)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_invalid_notebook_json() {
        let err = parse_front_matter("{not json", DocumentFormat::Notebook).unwrap_err();
        assert!(matches!(err, DocumentError::Notebook(_)));
    }
}
