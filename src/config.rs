use crate::constants::{CATALOG_DIR_NAME, DEFAULT_CATEGORY, DEFAULT_GIT_BIN, WORKSPACE_DIR_NAME};
use crate::layout::Layout;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default)]
struct PartialConfig {
    catalog_dir: Option<String>,
    workspace_dir: Option<String>,
    git_bin: Option<String>,
    default_category: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) catalog_dir: PathBuf,
    pub(crate) workspace_dir: PathBuf,
    pub(crate) git_bin: String,
    pub(crate) default_category: String,
}

impl Config {
    /// Built-in settings rooted at `home`: `~/.code.d` for the catalog and
    /// `~/code` for clones.
    pub(crate) fn with_home(home: &Path) -> Self {
        Self {
            catalog_dir: home.join(CATALOG_DIR_NAME),
            workspace_dir: home.join(WORKSPACE_DIR_NAME),
            git_bin: DEFAULT_GIT_BIN.to_string(),
            default_category: DEFAULT_CATEGORY.to_string(),
        }
    }

    pub(crate) fn load() -> Result<Self> {
        let home = dirs::home_dir().context("could not determine the home directory")?;
        let mut config = Self::with_home(&home);
        for path in config_paths(&home) {
            if !path.exists() {
                continue;
            }
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            config
                .apply(&raw, &home)
                .with_context(|| format!("failed to parse config file {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config file");
            break;
        }
        Ok(config)
    }

    pub(crate) fn apply(&mut self, raw: &str, home: &Path) -> Result<()> {
        let parsed: PartialConfig = toml::from_str(raw)?;
        if let Some(dir) = non_blank(parsed.catalog_dir) {
            self.catalog_dir = expand_home(&dir, home);
        }
        if let Some(dir) = non_blank(parsed.workspace_dir) {
            self.workspace_dir = expand_home(&dir, home);
        }
        if let Some(git_bin) = non_blank(parsed.git_bin) {
            self.git_bin = git_bin;
        }
        if let Some(category) = non_blank(parsed.default_category) {
            self.default_category = category;
        }
        Ok(())
    }

    pub(crate) fn layout(&self) -> Layout {
        Layout::new(self.catalog_dir.clone(), self.workspace_dir.clone())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

pub(crate) fn expand_home(value: &str, home: &Path) -> PathBuf {
    if value == "~" {
        return home.to_path_buf();
    }
    match value.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(value),
    }
}

fn config_paths(home: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("cody").join("config.toml"));
    }
    paths.push(home.join(".cody.toml"));
    paths
}
