//! Runtime configuration, read from the environment.

use std::path::PathBuf;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// JSON document holding all players. In-memory store when unset.
    pub data_path: Option<PathBuf>,
    /// Where pre-promotion snapshots go. No backups when unset.
    pub backup_dir: Option<PathBuf>,
    /// CSV roster imported at startup when the store is empty.
    pub roster_csv: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Settings {
            host: get("HOST").unwrap_or_else(default_host),
            port: get("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or_else(default_port),
            data_path: get("LADDER_DATA").map(PathBuf::from),
            backup_dir: get("BACKUP_DIR").map(PathBuf::from),
            roster_csv: get("ROSTER_CSV").map(PathBuf::from),
        }
    }
}
