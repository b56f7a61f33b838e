mod catalog;
mod cli;
mod commands;
mod config;
mod constants;
mod layout;
mod open;
mod process;
mod remove;
mod sync;
mod ui;


use anyhow::Result;
use clap::Parser;

use crate::cli::Cli;
use crate::config::Config;

fn main() {
    ui::init_logging();
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    tracing::debug!(
        catalog = %config.catalog_dir.display(),
        workspace = %config.workspace_dir.display(),
        "resolved layout"
    );
    commands::run(cli.command, &config)
}
