//! Content directory scanning.
//!
//! Every `.md`/`.mdx` file below the content root is a page. Its slug is the
//! path relative to the root without extension; `index` files take the slug
//! of their directory.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use bestium_docs_shared::{DocsError, Result};

/// Extensions treated as Markdown pages.
const PAGE_EXTENSIONS: &[&str] = &["md", "mdx"];

/// A page source discovered on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePage {
    /// Absolute or root-relative path of the file.
    pub path: PathBuf,
    /// Site slug (`server/installation`, `""` for the home page).
    pub slug: String,
}

/// Find all pages under `root`, sorted by slug.
///
/// Fails if two files resolve to the same slug.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn scan_pages(root: &Path) -> Result<Vec<SourcePage>> {
    if !root.is_dir() {
        return Err(DocsError::validation(format!(
            "content directory {} does not exist",
            root.display()
        )));
    }

    let mut pages = Vec::new();
    walk(root, root, &mut pages)?;
    pages.sort_by(|a, b| a.slug.cmp(&b.slug).then_with(|| a.path.cmp(&b.path)));

    // Two sources for one slug would overwrite the same output file.
    if let Some(pair) = pages.windows(2).find(|w| w[0].slug == w[1].slug) {
        return Err(DocsError::validation(format!(
            "{} and {} both map to slug '{}'",
            pair[0].path.display(),
            pair[1].path.display(),
            pair[0].slug
        )));
    }

    debug!(count = pages.len(), "content scanned");
    Ok(pages)
}

fn walk(root: &Path, dir: &Path, pages: &mut Vec<SourcePage>) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| DocsError::io(dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| DocsError::io(dir, e))?;
        let path = entry.path();

        if path.is_dir() {
            walk(root, &path, pages)?;
            continue;
        }

        let is_page = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| PAGE_EXTENSIONS.contains(&ext));
        if !is_page {
            continue;
        }

        if let Ok(relative) = path.strip_prefix(root) {
            let slug = slug_for(relative);
            pages.push(SourcePage { path, slug });
        }
    }

    Ok(())
}

/// Slug of a page from its path relative to the content root.
pub fn slug_for(relative: &Path) -> String {
    let without_ext = relative.with_extension("");
    let segments: Vec<String> = without_ext
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .map(slugify_segment)
        .filter(|s| !s.is_empty())
        .collect();

    match segments.split_last() {
        Some((last, parents)) if last == "index" => parents.join("/"),
        _ => segments.join("/"),
    }
}

/// Lowercase kebab-case, keeping only alphanumerics and dashes.
fn slugify_segment(segment: &str) -> String {
    segment
        .to_lowercase()
        .replace([' ', '_'], "-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '.')
        .collect()
}

/// Human-readable title from a slug, used when a page declares none.
pub fn title_from_slug(slug: &str) -> String {
    let segment = slug.rsplit('/').next().unwrap_or(slug);

    if segment.is_empty() {
        return "Home".to_string();
    }

    segment
        .replace(['-', '_'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    format!("{upper}{}", chars.collect::<String>())
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
