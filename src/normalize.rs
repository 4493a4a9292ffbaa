//! Field normalization: front-matter + file path → canonical document row.
//!
//! The document key and public URL are derived from the path alone, so the
//! same file always maps to the same key. Author and category fields are
//! accepted as scalar or list and split into a display string and a list of
//! edge targets. Links of the form `[name](url)` are pulled out of the
//! newline-flattened description, so a link wrapped across lines still
//! counts.

use regex::Regex;
use std::path::{Component, Path};

use crate::config::SiteConfig;
use crate::error::DocumentError;
use crate::frontmatter::FrontMatter;
use crate::models::{Document, NormalizedDocument, SourceLink};

const LINK_PATTERN: &str = r"\[(.*?)\]\((.*?)\)";

pub struct Normalizer {
    site: SiteConfig,
    link_re: Regex,
}

impl Normalizer {
    pub fn new(site: &SiteConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            site: site.clone(),
            link_re: Regex::new(LINK_PATTERN)?,
        })
    }

    pub fn normalize(
        &self,
        front: &FrontMatter,
        path: &Path,
    ) -> Result<NormalizedDocument, DocumentError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let title = text_field(front, "title")?;
        let date = text_field(front, "date")?;

        let description = text_field(front, "description")?.replace('\n', " ");
        let links = self.extract_links(&description);

        let (author, authors) = list_field(front, "author")?;
        let (categories_str, categories) = list_field(front, "categories")?;

        let document = Document {
            file_index: document_key(&self.site.label, path),
            doc_site: self.site.label.clone(),
            file_name,
            url: public_url(&self.site.base_url, path),
            title,
            description,
            author,
            categories: categories_str,
            date,
        };

        Ok(NormalizedDocument {
            document,
            categories,
            authors,
            links,
        })
    }

    pub fn extract_links(&self, description: &str) -> Vec<SourceLink> {
        self.link_re
            .captures_iter(description)
            .map(|caps| SourceLink {
                name: caps[1].to_string(),
                url: caps[2].to_string(),
            })
            .collect()
    }
}

/// `<label>_<parent dir>_<stem>_<ext>`.
pub fn document_key(label: &str, path: &Path) -> String {
    let parent = path
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();

    format!("{}_{}_{}_{}", label, parent, stem, ext)
}

/// Published page URL: `<base>/<dir>/<stem>.html`, with `..`, `.` and root
/// components dropped from `<dir>` and spaces escaped.
pub fn public_url(base_url: &str, path: &Path) -> String {
    let dir: Vec<String> = path
        .parent()
        .map(|p| {
            p.components()
                .filter_map(|c| match c {
                    Component::Normal(part) => Some(part.to_string_lossy().to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let base = base_url.trim_end_matches('/');
    let page = if dir.is_empty() {
        format!("{}.html", stem)
    } else {
        format!("{}/{}.html", dir.join("/"), stem)
    };
    format!("{}/{}", base, page.replace(' ', "%20"))
}

fn text_field(front: &FrontMatter, key: &str) -> Result<String, DocumentError> {
    Ok(front
        .field(key)?
        .map(|value| value.display())
        .unwrap_or_default())
}

/// Display string plus edge targets. A scalar category is a one-element list.
fn list_field(front: &FrontMatter, key: &str) -> Result<(String, Vec<String>), DocumentError> {
    Ok(front
        .field(key)?
        .map(|value| (value.display(), value.targets()))
        .unwrap_or_default())
}
