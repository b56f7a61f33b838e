pub(crate) const CATALOG_EXTENSION: &str = "code";
pub(crate) const CATALOG_DIR_NAME: &str = ".code.d";
pub(crate) const WORKSPACE_DIR_NAME: &str = "code";
pub(crate) const DEFAULT_CATEGORY: &str = "default";
pub(crate) const DEFAULT_GIT_BIN: &str = "git";

pub(crate) const SSH_REMOTE_PREFIX: &str = "git@";
pub(crate) const GIT_SUFFIX: &str = ".git";
pub(crate) const GIT_METADATA_DIR: &str = ".git";

pub(crate) const LOG_ENV_VAR: &str = "CODY_LOG";
pub(crate) const DEFAULT_LOG_FILTER: &str = "warn";
