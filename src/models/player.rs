//! Player record as stored in the player collection.

use crate::models::ladder::LadderName;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player record.
pub type PlayerId = Uuid;

fn default_active() -> bool {
    true
}

/// One player on one ladder.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub first_name: String,
    pub last_name: String,
    pub rating: u32,
    pub ladder_name: LadderName,
    /// 1 = top of the ladder. Dense over the ladder's active players.
    pub position: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl Player {
    /// New active player with a fresh id.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        rating: u32,
        ladder_name: LadderName,
        position: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into().trim().to_string(),
            last_name: last_name.into().trim().to_string(),
            rating,
            ladder_name,
            position,
            is_active: true,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Higher ladder this player qualifies for. Inactive players never qualify.
    pub fn promotion_target(&self) -> Option<LadderName> {
        if !self.is_active {
            return None;
        }
        self.ladder_name.promotion_target(self.rating)
    }
}
