use anyhow::{bail, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::DiscoveryConfig;

/// Walk `root` and return candidate document paths, sorted.
///
/// Paths keep `root` as their prefix (the way the directory was named on
/// the command line) because the document URL is derived from them.
pub fn scan_documents(root: &Path, config: &DiscoveryConfig) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("Input directory does not exist: {}", root.display());
    }

    let include_set = build_globset(&config.include_globs)?;

    let mut default_excludes = vec![
        "**/.git/**".to_string(),
        "**/_site/**".to_string(),
        "**/.ipynb_checkpoints/**".to_string(),
    ];
    default_excludes.extend(config.exclude_globs.clone());
    let exclude_set = build_globset(&default_excludes)?;

    let mut paths = Vec::new();

    let walker = WalkDir::new(root).follow_links(config.follow_symlinks);
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();

        // Apply exclude patterns
        if exclude_set.is_match(&rel_str) {
            continue;
        }

        // Apply include patterns
        if !include_set.is_match(&rel_str) {
            continue;
        }

        paths.push(path.to_path_buf());
    }

    // Sort for deterministic ordering
    paths.sort();

    Ok(paths)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn test_include_exclude_and_order() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "b/post.qmd");
        touch(root, "a/notebook.ipynb");
        touch(root, "a/index.qmd");
        touch(root, "index.qmd");
        touch(root, "a/notes.txt");
        touch(root, "a/.ipynb_checkpoints/notebook-checkpoint.ipynb");
        touch(root, "_site/b/post.qmd");

        let paths = scan_documents(root, &DiscoveryConfig::default()).unwrap();
        let rel: Vec<String> = paths
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(rel, vec!["a/notebook.ipynb", "b/post.qmd"]);
    }

    #[test]
    fn test_paths_keep_root_prefix() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "graph/intro.qmd");
        let paths = scan_documents(tmp.path(), &DiscoveryConfig::default()).unwrap();
        assert_eq!(paths, vec![tmp.path().join("graph/intro.qmd")]);
    }

    #[test]
    fn test_missing_root() {
        let tmp = TempDir::new().unwrap();
        assert!(scan_documents(&tmp.path().join("missing"), &DiscoveryConfig::default()).is_err());
    }

    #[test]
    fn test_bad_glob() {
        let tmp = TempDir::new().unwrap();
        let config = DiscoveryConfig {
            include_globs: vec!["a[".to_string()],
            ..DiscoveryConfig::default()
        };
        assert!(scan_documents(tmp.path(), &config).is_err());
    }
}
