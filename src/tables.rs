//! Node and edge table assembly.
//!
//! [`TableBuilder`] accepts normalized documents one at a time. Document
//! rows and edge rows are appended in arrival order; the Category, Author,
//! and Source node tables are produced from the [`EntityIndex`] when the
//! builder is finished, so they are complete before any consumer looks at
//! the edges that point into them.

use std::collections::HashSet;

use crate::dedup::EntityIndex;
use crate::error::DocumentError;
use crate::models::NormalizedDocument;

/// The seven tables of the graph model, in load order (nodes first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Document,
    Category,
    Author,
    Source,
    HasCategory,
    AuthoredBy,
    HasSource,
}

impl TableKind {
    pub const ALL: [TableKind; 7] = [
        TableKind::Document,
        TableKind::Category,
        TableKind::Author,
        TableKind::Source,
        TableKind::HasCategory,
        TableKind::AuthoredBy,
        TableKind::HasSource,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            TableKind::Document => "core_meta-data.csv",
            TableKind::Category => "unique_categories.csv",
            TableKind::Author => "unique_author.csv",
            TableKind::Source => "unique_source.csv",
            TableKind::HasCategory => "categories_meta-data.csv",
            TableKind::AuthoredBy => "author_meta-data.csv",
            TableKind::HasSource => "source_meta-data.csv",
        }
    }

    pub fn header(self) -> &'static [&'static str] {
        match self {
            TableKind::Document => &[
                "FileIndex",
                "DocSite",
                "FileName",
                "URL",
                "Title",
                "Description",
                "Author",
                "Categories",
                "Date",
            ],
            TableKind::Category => &["Category"],
            TableKind::Author => &["Author"],
            TableKind::Source => &["LinkURL"],
            TableKind::HasCategory => &["FileIndex", "Category"],
            TableKind::AuthoredBy => &["FileIndex", "Author"],
            TableKind::HasSource => &["FileIndex", "LinkURL", "LinkName"],
        }
    }

    /// Name of the table in the graph store.
    pub fn graph_table(self) -> &'static str {
        match self {
            TableKind::Document => "Document",
            TableKind::Category => "Category",
            TableKind::Author => "Author",
            TableKind::Source => "Source",
            TableKind::HasCategory => "has_category",
            TableKind::AuthoredBy => "authored_by",
            TableKind::HasSource => "has_source",
        }
    }

    pub fn is_edge(self) -> bool {
        matches!(
            self,
            TableKind::HasCategory | TableKind::AuthoredBy | TableKind::HasSource
        )
    }
}

/// One output table: header is implied by `kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub kind: TableKind,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    fn with_rows(kind: TableKind, rows: Vec<Vec<String>>) -> Self {
        Self { kind, rows }
    }

    pub fn header(&self) -> &'static [&'static str] {
        self.kind.header()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The complete table set of one run.
#[derive(Debug, Clone)]
pub struct GraphTables {
    tables: Vec<Table>,
}

impl GraphTables {
    pub fn get(&self, kind: TableKind) -> &Table {
        // `finish` lays the tables out in declaration order.
        &self.tables[kind as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }
}

#[derive(Debug, Default)]
pub struct TableBuilder {
    documents: Vec<Vec<String>>,
    has_category: Vec<Vec<String>>,
    authored_by: Vec<Vec<String>>,
    has_source: Vec<Vec<String>>,
    keys: HashSet<String>,
    index: EntityIndex,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one document's rows. A document whose key was already produced
    /// is rejected and contributes nothing.
    pub fn push(&mut self, doc: &NormalizedDocument) -> Result<(), DocumentError> {
        let d = &doc.document;
        if !self.keys.insert(d.file_index.clone()) {
            return Err(DocumentError::DuplicateKey(d.file_index.clone()));
        }

        self.documents.push(vec![
            d.file_index.clone(),
            d.doc_site.clone(),
            d.file_name.clone(),
            d.url.clone(),
            d.title.clone(),
            d.description.clone(),
            d.author.clone(),
            d.categories.clone(),
            d.date.clone(),
        ]);

        for category in &doc.categories {
            self.has_category
                .push(vec![d.file_index.clone(), category.clone()]);
        }
        for author in &doc.authors {
            self.authored_by
                .push(vec![d.file_index.clone(), author.clone()]);
        }
        for link in doc.links.iter().filter(|l| !l.url.is_empty()) {
            self.has_source.push(vec![
                d.file_index.clone(),
                link.url.clone(),
                link.name.clone(),
            ]);
        }

        self.index.observe(doc);
        Ok(())
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    #[cfg(test)]
    pub(crate) fn index(&self) -> &EntityIndex {
        &self.index
    }

    pub fn finish(self) -> GraphTables {
        let TableBuilder {
            documents,
            has_category,
            authored_by,
            has_source,
            index,
            ..
        } = self;

        let tables = vec![
            Table::with_rows(TableKind::Document, documents),
            Table::with_rows(TableKind::Category, single_column(index.categories())),
            Table::with_rows(TableKind::Author, single_column(index.authors())),
            Table::with_rows(TableKind::Source, single_column(index.sources())),
            Table::with_rows(TableKind::HasCategory, has_category),
            Table::with_rows(TableKind::AuthoredBy, authored_by),
            Table::with_rows(TableKind::HasSource, has_source),
        ];

        GraphTables { tables }
    }
}

fn single_column<'a>(values: impl Iterator<Item = &'a str>) -> Vec<Vec<String>> {
    values.map(|v| vec![v.to_string()]).collect()
}
