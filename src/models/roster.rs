//! Roster (the full player collection held in memory) and LadderError.

use crate::models::ladder::LadderName;
use crate::models::player::{Player, PlayerId};
use crate::store::StoreError;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Errors that can occur while working on a single player.
#[derive(Debug)]
pub enum LadderError {
    /// No player with this id.
    PlayerNotFound(PlayerId),
    /// Player is inactive and can't be moved.
    Inactive(PlayerId),
    /// Player's rating doesn't put them above their current ladder.
    NotEligible {
        player_id: PlayerId,
        ladder: LadderName,
        rating: u32,
    },
    /// Request entry without a usable player id.
    MalformedCandidate(String),
    /// Rating outside 0..=MAX_RATING.
    InvalidRating(u64),
    /// The ladder's last position is already `u32::MAX`; run fix-positions first.
    PositionOverflow(LadderName),
    /// The player kept changing ladders while we tried to lock it.
    Contended(PlayerId),
    /// Writing to the player store failed.
    Store(StoreError),
}

impl std::fmt::Display for LadderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LadderError::PlayerNotFound(id) => write!(f, "Player not found: {}", id),
            LadderError::Inactive(id) => write!(f, "Player {} is not active", id),
            LadderError::NotEligible { ladder, rating, .. } => write!(
                f,
                "Rating {} does not qualify for a ladder above {}",
                rating, ladder
            ),
            LadderError::MalformedCandidate(msg) => write!(f, "Malformed entry: {}", msg),
            LadderError::InvalidRating(r) => write!(f, "Rating out of range: {}", r),
            LadderError::PositionOverflow(ladder) => {
                write!(f, "No position left at the end of {}; fix positions first", ladder)
            }
            LadderError::Contended(id) => {
                write!(f, "Player {} changed ladders during the update, try again", id)
            }
            LadderError::Store(e) => write!(f, "Store error: {}", e),
        }
    }
}

impl std::error::Error for LadderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LadderError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for LadderError {
    fn from(e: StoreError) -> Self {
        LadderError::Store(e)
    }
}

/// Ladder order: position, then name, then id so ties resolve the same way every time.
pub fn ladder_order(a: &Player, b: &Player) -> Ordering {
    a.position
        .cmp(&b.position)
        .then_with(|| a.last_name.cmp(&b.last_name))
        .then_with(|| a.first_name.cmp(&b.first_name))
        .then_with(|| a.id.cmp(&b.id))
}

/// All player records, keyed by id.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Roster {
    players: HashMap<PlayerId, Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored records. Later duplicates of an id replace earlier ones.
    pub fn from_players(players: impl IntoIterator<Item = Player>) -> Self {
        Self {
            players: players.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    /// Insert or replace a record as-is.
    pub fn upsert(&mut self, player: Player) {
        self.players.insert(player.id, player);
    }

    /// Add a player at the bottom of their ladder and return the assigned position.
    /// Active players go right after the last active one; inactive players go after everyone.
    pub fn append(&mut self, mut player: Player) -> Result<u32, LadderError> {
        let ladder = player.ladder_name;
        let last = if player.is_active {
            self.max_position(ladder)
        } else {
            self.players
                .values()
                .filter(|p| p.ladder_name == ladder)
                .map(|p| p.position)
                .max()
                .unwrap_or(0)
        };
        player.position = last
            .checked_add(1)
            .ok_or(LadderError::PositionOverflow(ladder))?;
        let position = player.position;
        self.upsert(player);
        Ok(position)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// Every record of `ladder` in ladder order, active players first.
    pub fn ladder(&self, ladder: LadderName) -> Vec<&Player> {
        let mut players: Vec<&Player> = self
            .players
            .values()
            .filter(|p| p.ladder_name == ladder)
            .collect();
        players.sort_by(|a, b| b.is_active.cmp(&a.is_active).then_with(|| ladder_order(a, b)));
        players
    }

    /// Active players of `ladder` in ladder order.
    pub fn active_in(&self, ladder: LadderName) -> Vec<&Player> {
        let mut players: Vec<&Player> = self
            .players
            .values()
            .filter(|p| p.is_active && p.ladder_name == ladder)
            .collect();
        players.sort_by(|a, b| ladder_order(a, b));
        players
    }

    /// Highest position held by an active player of `ladder`, 0 when it has none.
    pub fn max_position(&self, ladder: LadderName) -> u32 {
        self.players
            .values()
            .filter(|p| p.is_active && p.ladder_name == ladder)
            .map(|p| p.position)
            .max()
            .unwrap_or(0)
    }

    /// Copy of the records that belong to any of `ladders`.
    pub fn subset(&self, ladders: &[LadderName]) -> Roster {
        Roster::from_players(
            self.players
                .values()
                .filter(|p| ladders.contains(&p.ladder_name))
                .cloned(),
        )
    }

    /// Records in `self` that are new or differ from `base`.
    pub fn changed_since(&self, base: &Roster) -> Vec<Player> {
        let mut changed: Vec<Player> = self
            .players
            .values()
            .filter(|p| base.get(p.id) != Some(*p))
            .cloned()
            .collect();
        changed.sort_by(|a, b| a.ladder_name.cmp(&b.ladder_name).then_with(|| ladder_order(a, b)));
        changed
    }

    /// All records sorted by ladder, then ladder order. Used for snapshots and backups.
    pub fn to_sorted_vec(&self) -> Vec<Player> {
        LadderName::ALL
            .into_iter()
            .flat_map(|l| self.ladder(l).into_iter().cloned().collect::<Vec<_>>())
            .collect()
    }

    /// True when `ladder`'s active positions are exactly 1..=N.
    pub fn is_dense(&self, ladder: LadderName) -> bool {
        self.active_in(ladder)
            .iter()
            .enumerate()
            .all(|(i, p)| p.position as usize == i + 1)
    }
}
