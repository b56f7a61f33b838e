use crate::catalog::CatalogEntry;
use crate::constants::GIT_METADATA_DIR;
use crate::layout::Layout;
use crate::process::{best_error_line, display_command, path_to_str, run_capture};
use crate::ui::progress;
use anyhow::{Context, Result, bail};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Materializes a remote at a local destination.
pub(crate) trait Cloner {
    fn clone_repo(&mut self, url: &str, dest: &Path) -> Result<()>;
}

#[derive(Debug, Clone)]
pub(crate) struct GitCloner {
    git_bin: String,
}

impl GitCloner {
    pub(crate) fn new(git_bin: impl Into<String>) -> Self {
        Self {
            git_bin: git_bin.into(),
        }
    }
}

impl Cloner for GitCloner {
    fn clone_repo(&mut self, url: &str, dest: &Path) -> Result<()> {
        let dest_str = path_to_str(dest)?;
        let args = ["clone", url, dest_str];
        progress(&format!("pull: {}", display_command(&self.git_bin, &args)));
        let output = run_capture(&self.git_bin, &args, None)?;
        if !output.status.success() {
            bail!("{}", best_error_line(&output.stderr));
        }
        tracing::debug!(url, stdout = %output.stdout.trim(), "clone finished");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SyncOutcome {
    Unsupported,
    AlreadyPresent(PathBuf),
    Cloned(PathBuf),
    Failed { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SyncReport {
    pub(crate) url: String,
    pub(crate) outcome: SyncOutcome,
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            SyncOutcome::Unsupported => {
                write!(f, "{}: skipped (unsupported URL format)", self.url)
            }
            SyncOutcome::AlreadyPresent(path) => {
                write!(f, "{}: skipped (already exists at {})", self.url, path.display())
            }
            SyncOutcome::Cloned(path) => {
                write!(f, "{}: clone success ({})", self.url, path.display())
            }
            SyncOutcome::Failed { path, reason } => {
                write!(f, "{}: clone failed ({}): {reason}", self.url, path.display())
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SyncSummary {
    pub(crate) cloned: usize,
    pub(crate) present: usize,
    pub(crate) unsupported: usize,
    pub(crate) failed: usize,
}

impl SyncSummary {
    pub(crate) fn from_reports(reports: &[SyncReport]) -> Self {
        let mut summary = Self::default();
        for report in reports {
            match report.outcome {
                SyncOutcome::Unsupported => summary.unsupported += 1,
                SyncOutcome::AlreadyPresent(_) => summary.present += 1,
                SyncOutcome::Cloned(_) => summary.cloned += 1,
                SyncOutcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }
}

/// A clone counts as present once its `.git` directory exists. Completeness
/// of that clone is not checked.
pub(crate) fn is_cloned(path: &Path) -> bool {
    path.join(GIT_METADATA_DIR).is_dir()
}

/// Clones every supported entry that is not on disk yet, in order. Clone
/// failures are recorded per entry and never stop the batch.
pub(crate) fn pull<'a, I>(layout: &Layout, entries: I, cloner: &mut dyn Cloner) -> Vec<SyncReport>
where
    I: IntoIterator<Item = &'a CatalogEntry>,
{
    entries
        .into_iter()
        .map(|entry| SyncReport {
            url: entry.url.clone(),
            outcome: sync_entry(layout, &entry.url, cloner),
        })
        .collect()
}

fn sync_entry(layout: &Layout, url: &str, cloner: &mut dyn Cloner) -> SyncOutcome {
    let Some(path) = layout.workspace_path(url) else {
        return SyncOutcome::Unsupported;
    };
    if is_cloned(&path) {
        return SyncOutcome::AlreadyPresent(path);
    }

    let result = prepare_destination(&path).and_then(|()| cloner.clone_repo(url, &path));
    match result {
        Ok(()) => SyncOutcome::Cloned(path),
        Err(err) => {
            tracing::debug!(url, error = %format!("{err:#}"), "clone failed");
            SyncOutcome::Failed {
                path,
                reason: format!("{err:#}"),
            }
        }
    }
}

fn prepare_destination(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}
