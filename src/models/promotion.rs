//! Promotion candidates, per-player outcomes and batch reports.

use crate::models::ladder::LadderName;
use crate::models::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};

/// A player whose rating qualifies them for a higher ladder.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionCandidate {
    pub id: PlayerId,
    pub first_name: String,
    pub last_name: String,
    pub rating: u32,
    pub current_ladder: LadderName,
    pub target_ladder: LadderName,
    pub position: u32,
}

impl PromotionCandidate {
    pub fn new(player: &Player, target_ladder: LadderName) -> Self {
        Self {
            id: player.id,
            first_name: player.first_name.clone(),
            last_name: player.last_name.clone(),
            rating: player.rating,
            current_ladder: player.ladder_name,
            target_ladder,
            position: player.position,
        }
    }
}

/// Reference to a player in a promote request. Only the id is authoritative; the rest is
/// whatever the client echoed back from the candidates check and is used for reporting.
/// The id may arrive as `id`, as `_id`, or as both (then `id` wins).
#[derive(Clone, Debug, Deserialize)]
#[serde(try_from = "RawCandidateRef")]
pub struct CandidateRef {
    pub id: PlayerId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCandidateRef {
    #[serde(default)]
    id: Option<PlayerId>,
    #[serde(default, rename = "_id")]
    legacy_id: Option<PlayerId>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
}

impl TryFrom<RawCandidateRef> for CandidateRef {
    type Error = &'static str;

    fn try_from(raw: RawCandidateRef) -> Result<Self, Self::Error> {
        Ok(CandidateRef {
            id: raw.id.or(raw.legacy_id).ok_or("missing player id")?,
            first_name: raw.first_name,
            last_name: raw.last_name,
        })
    }
}

impl CandidateRef {
    pub fn display_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(f), Some(l)) => Some(format!("{} {}", f, l)),
            (Some(n), None) | (None, Some(n)) => Some(n.clone()),
            (None, None) => None,
        }
    }
}

/// One entry of a promote request. Entries that don't carry a usable id are kept so they
/// can be reported back instead of failing the whole request.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum CandidateEntry {
    Valid(CandidateRef),
    Malformed(serde_json::Value),
}

impl From<PlayerId> for CandidateEntry {
    fn from(id: PlayerId) -> Self {
        CandidateEntry::Valid(CandidateRef {
            id,
            first_name: None,
            last_name: None,
        })
    }
}

impl From<&PromotionCandidate> for CandidateEntry {
    fn from(c: &PromotionCandidate) -> Self {
        CandidateEntry::Valid(CandidateRef {
            id: c.id,
            first_name: Some(c.first_name.clone()),
            last_name: Some(c.last_name.clone()),
        })
    }
}

/// A completed promotion.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionRecord {
    pub player_id: PlayerId,
    pub name: String,
    pub rating: u32,
    pub from_ladder: LadderName,
    pub to_ladder: LadderName,
    pub old_position: u32,
    pub new_position: u32,
    /// Players in the source ladder whose position moved up to close the gap.
    pub reindexed_count: usize,
}

/// A candidate that could not be promoted.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionFailure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub reason: String,
}

/// Result of processing one candidate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PromotionOutcome {
    Promoted(PromotionRecord),
    Failed(PromotionFailure),
}

/// Summary of a promote call, in the shape the admin page expects.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionReport {
    pub success: bool,
    pub promoted_count: usize,
    pub error_count: usize,
    pub promotions: Vec<PromotionRecord>,
    pub failures: Vec<PromotionFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_file: Option<String>,
}

impl PromotionReport {
    /// Fold per-candidate outcomes into a report. The call itself always succeeds;
    /// individual failures only show up in the counts.
    pub fn from_outcomes(outcomes: Vec<PromotionOutcome>, backup_file: Option<String>) -> Self {
        let mut report = Self {
            success: true,
            backup_file,
            ..Self::default()
        };
        for outcome in outcomes {
            match outcome {
                PromotionOutcome::Promoted(record) => report.promotions.push(record),
                PromotionOutcome::Failed(failure) => report.failures.push(failure),
            }
        }
        report.promoted_count = report.promotions.len();
        report.error_count = report.failures.len();
        report
    }

    /// Sum of reindexed players across all promotions.
    pub fn total_reindexed(&self) -> usize {
        self.promotions.iter().map(|p| p.reindexed_count).sum()
    }
}

/// Outcome of compressing one ladder's positions.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LadderFix {
    pub ladder: LadderName,
    pub total_players: usize,
    pub fixed_positions: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn parse(value: serde_json::Value) -> CandidateEntry {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn id_and_legacy_id_are_both_accepted() {
        let id = Uuid::new_v4();
        for value in [
            json!({ "id": id }),
            json!({ "_id": id, "firstName": "Ann" }),
            json!({ "_id": id, "id": id, "firstName": "Ann", "lastName": "Archer" }),
        ] {
            match parse(value) {
                CandidateEntry::Valid(c) => assert_eq!(c.id, id),
                CandidateEntry::Malformed(v) => panic!("rejected {}", v),
            }
        }
    }

    #[test]
    fn id_wins_over_legacy_id() {
        let (id, other) = (Uuid::new_v4(), Uuid::new_v4());
        match parse(json!({ "id": id, "_id": other })) {
            CandidateEntry::Valid(c) => assert_eq!(c.id, id),
            CandidateEntry::Malformed(v) => panic!("rejected {}", v),
        }
    }

    #[test]
    fn entries_without_an_id_are_malformed() {
        for value in [json!({ "firstName": "Ann" }), json!({ "id": "nope" }), json!(7)] {
            assert!(matches!(parse(value), CandidateEntry::Malformed(_)));
        }
    }
}
