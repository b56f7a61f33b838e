use crate::catalog::{CatalogEntry, filter_entries};
use crate::layout::Layout;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum LookupError {
    #[error("no catalog entry matches `{filter}`")]
    NotFound { filter: String },
    #[error("`{filter}` is ambiguous; it matches:\n{}", format_matches(.matches))]
    Ambiguous { filter: String, matches: Vec<String> },
    #[error("`{url}` is not a git@host:path remote and has no workspace path")]
    Unsupported { url: String },
}

fn format_matches(matches: &[String]) -> String {
    matches
        .iter()
        .map(|url| format!("- {url}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Workspace path of the one entry whose url contains `filter`. Ties are
/// never broken: several matches are reported back as [`LookupError::Ambiguous`].
pub(crate) fn resolve_single(
    layout: &Layout,
    entries: &[CatalogEntry],
    filter: &str,
) -> Result<PathBuf, LookupError> {
    let mut matches = filter_entries(entries, filter);
    match matches.len() {
        0 => Err(LookupError::NotFound {
            filter: filter.to_string(),
        }),
        1 => {
            let entry = matches.remove(0);
            layout
                .workspace_path(&entry.url)
                .ok_or_else(|| LookupError::Unsupported {
                    url: entry.url.clone(),
                })
        }
        _ => Err(LookupError::Ambiguous {
            filter: filter.to_string(),
            matches: matches.into_iter().map(|entry| entry.url.clone()).collect(),
        }),
    }
}
