use crate::constants::CATALOG_EXTENSION;
use crate::layout::Layout;
use anyhow::{Context, Result, bail};
use std::ffi::OsStr;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CatalogEntry {
    pub(crate) category: String,
    pub(crate) url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AppendOutcome {
    Added,
    AlreadyPresent,
}

/// Trimmed, non-empty lines of `content` in their original order.
pub(crate) fn parse_entries(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn read_entries(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file {}", path.display()))?;
    Ok(parse_entries(&content))
}

pub(crate) fn append_entry(layout: &Layout, category: &str, url: &str) -> Result<AppendOutcome> {
    let url = url.trim();
    if url.is_empty() {
        bail!("remote url must not be empty");
    }

    let path = layout.catalog_file(category);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let existing = if path.exists() {
        fs::read_to_string(&path)
            .with_context(|| format!("failed to read catalog file {}", path.display()))?
    } else {
        String::new()
    };
    if existing.lines().any(|line| line.trim() == url) {
        return Ok(AppendOutcome::AlreadyPresent);
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open catalog file {}", path.display()))?;
    let mut record = String::new();
    if !existing.is_empty() && !existing.ends_with('\n') {
        record.push('\n');
    }
    record.push_str(url);
    record.push('\n');
    file.write_all(record.as_bytes())
        .with_context(|| format!("failed to write catalog file {}", path.display()))?;
    Ok(AppendOutcome::Added)
}

/// Replaces the contents of `path` with `kept`, one per line. The new content
/// is written to a sibling temp file and renamed into place.
pub(crate) fn rewrite_entries(path: &Path, kept: &[String]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut content = kept.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    if let Ok(metadata) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .with_context(|| format!("failed to copy permissions of {}", path.display()))?;
    }
    tmp.write_all(content.as_bytes())
        .with_context(|| format!("failed to write temp file for {}", path.display()))?;
    tmp.flush()
        .with_context(|| format!("failed to flush temp file for {}", path.display()))?;
    tmp.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("failed to replace catalog file {}", path.display()))?;
    Ok(())
}

/// Every `*.code` file under the catalog root, walked recursively in file
/// name order. A missing catalog root is an empty catalog.
pub(crate) fn catalog_files(layout: &Layout) -> Result<Vec<PathBuf>> {
    let root = layout.catalog_root();
    if !root.exists() {
        tracing::debug!(root = %root.display(), "catalog root does not exist yet");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("failed to walk catalog root {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension() != Some(OsStr::new(CATALOG_EXTENSION)) {
            continue;
        }
        files.push(entry.into_path());
    }
    Ok(files)
}

/// All entries of every catalog file in file-then-line order. The first
/// unreadable file aborts the scan.
pub(crate) fn collect_all_entries(layout: &Layout) -> Result<Vec<CatalogEntry>> {
    let mut entries = Vec::new();
    for file in catalog_files(layout)? {
        let category = layout
            .category_of(&file)
            .unwrap_or_else(|| file.display().to_string());
        for url in read_entries(&file)? {
            entries.push(CatalogEntry {
                category: category.clone(),
                url,
            });
        }
    }
    Ok(entries)
}

/// Case-sensitive substring filter. An empty pattern keeps everything.
pub(crate) fn filter_entries<'a>(
    entries: &'a [CatalogEntry],
    pattern: &str,
) -> Vec<&'a CatalogEntry> {
    entries
        .iter()
        .filter(|entry| entry.url.contains(pattern))
        .collect()
}
