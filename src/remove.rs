use crate::catalog::{catalog_files, read_entries, rewrite_entries};
use crate::layout::Layout;
use anyhow::{Result, bail};
use std::path::PathBuf;

/// Asks the user to approve a single removal.
pub(crate) trait Confirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Removal {
    pub(crate) file: PathBuf,
    pub(crate) url: String,
}

#[derive(Debug, Default)]
pub(crate) struct RemovalSummary {
    pub(crate) removed: Vec<Removal>,
    pub(crate) declined: Vec<Removal>,
    pub(crate) rewritten_files: Vec<PathBuf>,
}

impl RemovalSummary {
    pub(crate) fn matched_any(&self) -> bool {
        !self.removed.is_empty() || !self.declined.is_empty()
    }
}

/// Drops every line containing `target` from every catalog file, asking
/// `confirm` for each one unless `force` is set. Each occurrence is judged
/// on its own, and only files with at least one matching line are rewritten.
/// Every catalog file is read before the first rewrite, so an unreadable file
/// leaves the whole catalog untouched.
pub(crate) fn remove_matching(
    layout: &Layout,
    target: &str,
    force: bool,
    confirm: &mut dyn Confirm,
) -> Result<RemovalSummary> {
    if target.is_empty() {
        bail!("removal target must not be empty");
    }

    let mut matched_files = Vec::new();
    for file in catalog_files(layout)? {
        let lines = read_entries(&file)?;
        if lines.iter().any(|line| line.contains(target)) {
            matched_files.push((file, lines));
        }
    }

    let mut summary = RemovalSummary::default();
    for (file, lines) in matched_files {
        let category = layout
            .category_of(&file)
            .unwrap_or_else(|| file.display().to_string());
        let mut kept = Vec::with_capacity(lines.len());
        for line in lines {
            if !line.contains(target) {
                kept.push(line);
                continue;
            }

            let approved =
                force || confirm.confirm(&format!("Remove `{line}` from category `{category}`?"))?;
            let removal = Removal {
                file: file.clone(),
                url: line.clone(),
            };
            if approved {
                tracing::debug!(url = %line, file = %file.display(), "dropping catalog entry");
                summary.removed.push(removal);
            } else {
                kept.push(line);
                summary.declined.push(removal);
            }
        }

        rewrite_entries(&file, &kept)?;
        summary.rewritten_files.push(file);
    }

    Ok(summary)
}
