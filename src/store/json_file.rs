//! One JSON document holding every player record.

use crate::models::{Player, PlayerId, Roster};
use crate::store::{PlayerStore, StoreError};
use std::collections::HashMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// File-backed store. The file is rewritten on every save through a temp file and a
/// rename, so readers never see a half-written document.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    players: Mutex<HashMap<PlayerId, Player>>,
}

impl JsonFileStore {
    /// Open `path`, or start empty if it doesn't exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let players: Vec<Player> = match fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        log::info!("Loaded {} players from {}", players.len(), path.display());
        Ok(Self {
            path,
            players: Mutex::new(players.into_iter().map(|p| (p.id, p)).collect()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file(&self, players: &HashMap<PlayerId, Player>) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let sorted = Roster::from_players(players.values().cloned()).to_sorted_vec();
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut w = BufWriter::new(fs::File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut w, &sorted)?;
            w.flush()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl PlayerStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Player>, StoreError> {
        let g = self.players.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(g.values().cloned().collect())
    }

    fn save(&self, players: &[Player]) -> Result<(), StoreError> {
        let mut g = self.players.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut next = g.clone();
        for p in players {
            next.insert(p.id, p.clone());
        }
        self.write_file(&next)?;
        *g = next;
        Ok(())
    }
}
