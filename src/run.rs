mod cli;
mod prompt;

use std::path::{Path, PathBuf};

pub(crate) use cli::{as_cli, Command};

/// Expand a leading `~/` to the home directory.
pub(crate) fn shellexpand(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        PathBuf::from(home).join(rest)
    } else {
        path.to_path_buf()
    }
}
