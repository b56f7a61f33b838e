use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "cody",
    version,
    about = "Catalog git remotes by category and clone them into ~/code/<host>/<path>"
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Print catalog entries containing a pattern, or every entry.
    #[command(alias = "s")]
    Search {
        pattern: Option<String>,
        /// Print entries as JSON with their category and workspace path.
        #[arg(long)]
        json: bool,
    },
    /// File a remote url under a category.
    Add {
        url: String,
        /// Category name. Defaults to `default_category` from the config.
        category: Option<String>,
    },
    /// Clone every cataloged remote that is not on disk yet.
    Pull {
        /// Only sync entries whose url contains this text.
        filter: Option<String>,
    },
    /// Print the workspace path of the single entry matching a filter.
    Open { filter: String },
    /// Remove catalog entries containing a substring.
    Rm {
        target: String,
        /// Skip the confirmation prompt for each match.
        #[arg(short = 'f', long)]
        force: bool,
    },
    /// Run sanity checks on the catalog and the git binary.
    Doctor,
}
