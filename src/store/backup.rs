use crate::models::Player;
use crate::store::StoreError;
use chrono::Utc;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write a snapshot of `players` to `<dir>/<prefix>-<timestamp>.json` and return the path.
pub fn write_backup(dir: &Path, prefix: &str, players: &[Player]) -> Result<PathBuf, StoreError> {
    fs::create_dir_all(dir)?;
    let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S-%3fZ");
    let path = dir.join(format!("{}-{}.json", prefix, timestamp));
    let mut w = BufWriter::new(fs::File::create(&path)?);
    serde_json::to_writer_pretty(&mut w, players)?;
    w.flush()?;
    log::info!("Backup created: {}", path.display());
    Ok(path)
}
