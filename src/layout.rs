use crate::constants::{CATALOG_EXTENSION, GIT_SUFFIX, SSH_REMOTE_PREFIX};
use std::path::{Path, PathBuf};

/// Where catalog files live and where clones are materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Layout {
    catalog_root: PathBuf,
    workspace_root: PathBuf,
}

/// Host and repository path of a `git@host:path` remote, `.git` stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RemoteLocation {
    pub(crate) host: String,
    pub(crate) path: String,
}

impl Layout {
    pub(crate) fn new(catalog_root: PathBuf, workspace_root: PathBuf) -> Self {
        Self {
            catalog_root,
            workspace_root,
        }
    }

    pub(crate) fn catalog_root(&self) -> &Path {
        &self.catalog_root
    }

    pub(crate) fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// `<catalog_root>/<category>.code`. The category is not validated; a
    /// name containing `/` points into a nested directory.
    pub(crate) fn catalog_file(&self, category: &str) -> PathBuf {
        self.catalog_root.join(format!("{category}.{CATALOG_EXTENSION}"))
    }

    /// Inverse of [`Layout::catalog_file`] for files under the catalog root.
    pub(crate) fn category_of(&self, file: &Path) -> Option<String> {
        let relative = file.strip_prefix(&self.catalog_root).ok()?;
        let raw = relative.to_str()?;
        let category = raw.strip_suffix(&format!(".{CATALOG_EXTENSION}"))?;
        Some(category.replace('\\', "/"))
    }

    /// Local clone destination for `url`, or `None` when the URL is not a
    /// `git@host:path` remote. The result always lies under the workspace root.
    pub(crate) fn workspace_path(&self, url: &str) -> Option<PathBuf> {
        let remote = parse_remote(url)?;
        Some(self.workspace_root.join(remote.host).join(remote.path))
    }
}

pub(crate) fn parse_remote(url: &str) -> Option<RemoteLocation> {
    let rest = url.strip_prefix(SSH_REMOTE_PREFIX)?;
    let (host, path) = rest.split_once(':')?;
    let path = path.trim_start_matches('/');
    let path = path.strip_suffix(GIT_SUFFIX).unwrap_or(path);
    if !is_plain_segment(host) || path.is_empty() {
        return None;
    }
    if path.split('/').any(|segment| segment == "..") || path.contains('\\') {
        return None;
    }
    Some(RemoteLocation {
        host: host.to_string(),
        path: path.to_string(),
    })
}

fn is_plain_segment(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && value != ".."
        && !value.contains('/')
        && !value.contains('\\')
}
