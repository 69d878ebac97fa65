//! Data directory layout.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "CLAIMCHAT_DATA_DIR";

/// Resolve the data directory.
///
/// Uses `CLAIMCHAT_DATA_DIR` if set, else `~/.claimchat`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".claimchat");
    }

    // Last resort: current directory
    PathBuf::from(".claimchat")
}

/// SQLite URL for the conversation store inside `data_dir`.
pub fn database_url(data_dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", data_dir.join("claimchat.db").display())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_points_into_data_dir() {
        let url = database_url(Path::new("/tmp/claimchat-data"));
        assert_eq!(url, "sqlite:///tmp/claimchat-data/claimchat.db?mode=rwc");
    }

    #[test]
    fn test_resolve_data_dir_is_not_empty() {
        let dir = resolve_data_dir();
        assert!(!dir.as_os_str().is_empty());
    }
}
