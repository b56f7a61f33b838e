use crate::catalog::{
    AppendOutcome, CatalogEntry, append_entry, catalog_files, collect_all_entries, filter_entries,
};
use crate::cli::Commands;
use crate::config::Config;
use crate::layout::Layout;
use crate::open::resolve_single;
use crate::process::binary_version;
use crate::remove::{Confirm, remove_matching};
use crate::sync::{Cloner, GitCloner, SyncOutcome, SyncSummary, pull};
use crate::ui::{TerminalConfirm, progress};
use anyhow::{Result, bail};
use serde::Serialize;

pub(crate) fn run(command: Commands, config: &Config) -> Result<()> {
    let layout = config.layout();
    match command {
        Commands::Search { pattern, json } => cmd_search(&layout, pattern.as_deref(), json),
        Commands::Add { url, category } => {
            let category = category.unwrap_or_else(|| config.default_category.clone());
            cmd_add(&layout, &url, &category)
        }
        Commands::Pull { filter } => {
            let mut cloner = GitCloner::new(config.git_bin.clone());
            cmd_pull(&layout, filter.as_deref(), &mut cloner)
        }
        Commands::Open { filter } => cmd_open(&layout, &filter),
        Commands::Rm { target, force } => cmd_rm(&layout, &target, force, &mut TerminalConfirm),
        Commands::Doctor => cmd_doctor(config, &layout),
    }
}

#[derive(Debug, Serialize)]
struct JsonSearchRow<'a> {
    category: &'a str,
    url: &'a str,
    path: Option<String>,
}

fn cmd_search(layout: &Layout, pattern: Option<&str>, as_json: bool) -> Result<()> {
    let entries = collect_all_entries(layout)?;
    let matches = filter_entries(&entries, pattern.unwrap_or_default());

    if as_json {
        let rows: Vec<JsonSearchRow<'_>> = matches
            .iter()
            .map(|entry| JsonSearchRow {
                category: &entry.category,
                url: &entry.url,
                path: layout
                    .workspace_path(&entry.url)
                    .map(|path| path.display().to_string()),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for entry in matches {
        println!("{}", entry.url);
    }
    Ok(())
}

fn cmd_add(layout: &Layout, url: &str, category: &str) -> Result<()> {
    progress(&format!("add: filing `{}` under `{category}`", url.trim()));
    let path = layout.catalog_file(category);
    match append_entry(layout, category, url)? {
        AppendOutcome::Added => println!("Entry added successfully to {}", path.display()),
        AppendOutcome::AlreadyPresent => println!("Entry already exists in {}", path.display()),
    }
    Ok(())
}

pub(crate) fn cmd_pull(
    layout: &Layout,
    filter: Option<&str>,
    cloner: &mut dyn Cloner,
) -> Result<()> {
    progress("pull: scanning catalog");
    let entries = collect_all_entries(layout)?;
    let selected: Vec<&CatalogEntry> = filter_entries(&entries, filter.unwrap_or_default());

    let reports = pull(layout, selected, cloner);
    for report in &reports {
        if matches!(report.outcome, SyncOutcome::Failed { .. }) {
            eprintln!("{report}");
        } else {
            println!("{report}");
        }
    }

    let summary = SyncSummary::from_reports(&reports);
    println!(
        "pull: cloned {}, present {}, unsupported {}, failed {}",
        summary.cloned, summary.present, summary.unsupported, summary.failed
    );
    Ok(())
}

fn cmd_open(layout: &Layout, filter: &str) -> Result<()> {
    let entries = collect_all_entries(layout)?;
    let path = resolve_single(layout, &entries, filter)?;
    println!("{}", path.display());
    Ok(())
}

pub(crate) fn cmd_rm(
    layout: &Layout,
    target: &str,
    force: bool,
    confirm: &mut dyn Confirm,
) -> Result<()> {
    progress(&format!("rm: scanning catalog for `{target}`"));
    let summary = remove_matching(layout, target, force, confirm)?;
    tracing::debug!(files = summary.rewritten_files.len(), "rewrote catalog files");
    if !summary.matched_any() {
        println!("entry not found");
        return Ok(());
    }

    for removal in &summary.removed {
        println!("Removed {} from {}", removal.url, removal.file.display());
    }
    for declined in &summary.declined {
        println!("Kept {} in {}", declined.url, declined.file.display());
    }
    Ok(())
}

#[derive(Debug)]
struct Check {
    name: String,
    ok: bool,
    detail: String,
    fix: Option<String>,
}

impl Check {
    fn ok(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ok: true,
            detail: detail.into(),
            fix: None,
        }
    }

    fn fail(name: impl Into<String>, detail: impl Into<String>, fix: Option<String>) -> Self {
        Self {
            name: name.into(),
            ok: false,
            detail: detail.into(),
            fix,
        }
    }

    fn print(&self) {
        let state = if self.ok { "OK" } else { "FAIL" };
        println!("[{state}] {}: {}", self.name, self.detail);
        if let Some(fix) = &self.fix {
            println!("      fix: {fix}");
        }
    }
}

fn cmd_doctor(config: &Config, layout: &Layout) -> Result<()> {
    progress("doctor: running environment checks");
    let mut checks = Vec::new();
    let mut failed = false;

    let root = layout.catalog_root();
    if root.is_dir() {
        checks.push(Check::ok("Catalog root", format!("found {}", root.display())));
    } else {
        checks.push(Check::ok(
            "Catalog root",
            format!("{} will be created by the first `cody add`", root.display()),
        ));
    }

    let scan = catalog_files(layout).and_then(|files| {
        let entries = collect_all_entries(layout)?;
        Ok((files.len(), entries))
    });
    match scan {
        Ok((file_count, entries)) => {
            checks.push(Check::ok(
                "Catalog readable",
                format!("{} entries in {file_count} categories", entries.len()),
            ));
            let unsupported = entries
                .iter()
                .filter(|entry| layout.workspace_path(&entry.url).is_none())
                .count();
            if unsupported == 0 {
                checks.push(Check::ok(
                    "Remote urls",
                    "every entry maps to a workspace path".to_string(),
                ));
            } else {
                checks.push(Check::ok(
                    "Remote urls",
                    format!("{unsupported} entries are not git@host:path remotes; pull skips them"),
                ));
            }
        }
        Err(err) => {
            failed = true;
            checks.push(Check::fail(
                "Catalog readable",
                format!("{err:#}"),
                Some(format!("check permissions under {}", root.display())),
            ));
        }
    }

    if let Some(version) = binary_version(&config.git_bin) {
        checks.push(Check::ok("git installed", version));
    } else {
        failed = true;
        checks.push(Check::fail(
            "git installed",
            format!("`{}` is not callable", config.git_bin),
            Some("install git or set `git_bin` in ~/.cody.toml".to_string()),
        ));
    }

    checks.push(Check::ok(
        "Workspace root",
        format!("clones land under {}", layout.workspace_root().display()),
    ));

    for check in checks {
        check.print();
    }

    if failed {
        bail!("doctor found failing checks")
    } else {
        Ok(())
    }
}
