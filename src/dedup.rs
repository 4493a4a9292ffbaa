//! Corpus-wide entity deduplication.
//!
//! [`EntityIndex`] is the accumulator threaded through a run: every
//! normalized document feeds its categories, authors, and link URLs in, and
//! the node tables for those entities are produced from it once the whole
//! corpus has been seen. Sets are ordered so the node tables come out sorted
//! and byte-identical across runs.

use std::collections::BTreeSet;

use crate::models::NormalizedDocument;

#[derive(Debug, Clone, Default)]
pub struct EntityIndex {
    categories: BTreeSet<String>,
    authors: BTreeSet<String>,
    sources: BTreeSet<String>,
}

impl EntityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every entity referenced by one document.
    pub fn observe(&mut self, doc: &NormalizedDocument) {
        for category in &doc.categories {
            self.insert_category(category);
        }
        for author in &doc.authors {
            self.insert_author(author);
        }
        for link in &doc.links {
            self.insert_source(&link.url);
        }
    }

    pub fn insert_category(&mut self, category: &str) -> bool {
        insert_non_empty(&mut self.categories, category)
    }

    pub fn insert_author(&mut self, author: &str) -> bool {
        insert_non_empty(&mut self.authors, author)
    }

    pub fn insert_source(&mut self, url: &str) -> bool {
        insert_non_empty(&mut self.sources, url)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    pub fn authors(&self) -> impl Iterator<Item = &str> {
        self.authors.iter().map(String::as_str)
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(String::as_str)
    }

    #[cfg(test)]
    pub(crate) fn contains_category(&self, category: &str) -> bool {
        self.categories.contains(category)
    }

    #[cfg(test)]
    pub(crate) fn contains_author(&self, author: &str) -> bool {
        self.authors.contains(author)
    }

    #[cfg(test)]
    pub(crate) fn contains_source(&self, url: &str) -> bool {
        self.sources.contains(url)
    }
}

fn insert_non_empty(set: &mut BTreeSet<String>, value: &str) -> bool {
    if value.is_empty() || set.contains(value) {
        return false;
    }
    set.insert(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_collapse() {
        let mut index = EntityIndex::new();
        assert!(index.insert_author("Jane"));
        assert!(!index.insert_author("Jane"));
        assert!(index.insert_author("Abe"));
        assert_eq!(index.authors().collect::<Vec<_>>(), vec!["Abe", "Jane"]);
    }

    #[test]
    fn test_empty_values_never_inserted() {
        let mut index = EntityIndex::new();
        assert!(!index.insert_author(""));
        assert!(!index.insert_category(""));
        assert!(!index.insert_source(""));
        assert_eq!(index.authors().count(), 0);
        assert_eq!(index.categories().count(), 0);
        assert_eq!(index.sources().count(), 0);
    }

    #[test]
    fn test_classes_are_independent() {
        let mut index = EntityIndex::new();
        index.insert_author("x");
        index.insert_category("x");
        assert!(index.contains_author("x"));
        assert!(index.contains_category("x"));
        assert!(!index.contains_source("x"));
    }
}
