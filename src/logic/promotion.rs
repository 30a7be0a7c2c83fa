//! Promotion: find players who outgrew their ladder and move them up.

use crate::logic::positions::reindex_ladder;
use crate::models::{LadderError, PlayerId, PromotionCandidate, PromotionRecord, Roster};

/// Active players whose rating puts them on a higher ladder, sorted by current ladder then
/// position. Players whose rating fell below their ladder are left alone.
pub fn check_promotion_candidates(roster: &Roster) -> Vec<PromotionCandidate> {
    let mut candidates: Vec<PromotionCandidate> = roster
        .players()
        .filter_map(|p| p.promotion_target().map(|target| PromotionCandidate::new(p, target)))
        .collect();
    candidates.sort_by(|a, b| {
        a.current_ladder
            .cmp(&b.current_ladder)
            .then(a.position.cmp(&b.position))
            .then_with(|| a.id.cmp(&b.id))
    });
    candidates
}

/// Move one player to the ladder their rating implies.
///
/// 1. Take the player off the source ladder and close the gap behind them.
/// 2. Append them after the last active player of the destination ladder.
///
/// Both ladders are dense afterwards. On error the roster is unchanged, including when the
/// destination's last position is `u32::MAX` and nothing can be appended.
pub fn promote_player(
    roster: &mut Roster,
    player_id: PlayerId,
) -> Result<PromotionRecord, LadderError> {
    let player = roster
        .get(player_id)
        .ok_or(LadderError::PlayerNotFound(player_id))?;
    if !player.is_active {
        return Err(LadderError::Inactive(player_id));
    }
    let from_ladder = player.ladder_name;
    let old_position = player.position;
    let to_ladder = player
        .promotion_target()
        .ok_or(LadderError::NotEligible {
            player_id,
            ladder: from_ladder,
            rating: player.rating,
        })?;
    let name = player.full_name();
    let rating = player.rating;

    let appended_at = roster
        .max_position(to_ladder)
        .checked_add(1)
        .ok_or(LadderError::PositionOverflow(to_ladder))?;
    if let Some(p) = roster.get_mut(player_id) {
        p.ladder_name = to_ladder;
        p.position = appended_at;
    }

    let reindexed_count = reindex_ladder(roster, from_ladder);
    // Only does anything if the destination already had gaps.
    reindex_ladder(roster, to_ladder);
    let new_position = roster
        .get(player_id)
        .map(|p| p.position)
        .unwrap_or(appended_at);

    log::info!(
        "Promoted {}: {} (pos {}) -> {} (pos {}). Re-indexed {} players.",
        name,
        from_ladder,
        old_position,
        to_ladder,
        new_position,
        reindexed_count
    );

    Ok(PromotionRecord {
        player_id,
        name,
        rating,
        from_ladder,
        to_ladder,
        old_position,
        new_position,
        reindexed_count,
    })
}
