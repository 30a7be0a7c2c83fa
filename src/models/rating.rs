//! Bulk rating updates.

use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};

/// New rating for one player.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingUpdate {
    pub player_id: PlayerId,
    #[serde(alias = "newFargoRate")]
    pub new_rating: u64,
}

/// One entry of a rating update request; unusable entries are counted as errors.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RatingUpdateEntry {
    Valid(RatingUpdate),
    Malformed(serde_json::Value),
}

impl RatingUpdateEntry {
    pub fn new(player_id: PlayerId, new_rating: u64) -> Self {
        RatingUpdateEntry::Valid(RatingUpdate {
            player_id,
            new_rating,
        })
    }
}

/// A rating that actually changed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingChange {
    pub player_id: PlayerId,
    pub name: String,
    pub old_rating: u32,
    pub new_rating: u32,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingUpdateReport {
    pub success: bool,
    pub updated_count: usize,
    pub unchanged_count: usize,
    pub error_count: usize,
    pub changes: Vec<RatingChange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_file: Option<String>,
}
