use crate::models::{Player, PlayerId};
use crate::store::{PlayerStore, StoreError};
use std::collections::HashMap;
use std::sync::Mutex;

/// Store that lives only as long as the process. Used when no data file is configured.
#[derive(Debug, Default)]
pub struct MemoryStore {
    players: Mutex<HashMap<PlayerId, Player>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_players(players: impl IntoIterator<Item = Player>) -> Self {
        Self {
            players: Mutex::new(players.into_iter().map(|p| (p.id, p)).collect()),
        }
    }
}

impl PlayerStore for MemoryStore {
    fn load(&self) -> Result<Vec<Player>, StoreError> {
        let g = self.players.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(g.values().cloned().collect())
    }

    fn save(&self, players: &[Player]) -> Result<(), StoreError> {
        let mut g = self.players.lock().map_err(|_| StoreError::LockPoisoned)?;
        for p in players {
            g.insert(p.id, p.clone());
        }
        Ok(())
    }
}
