//! Rating updates. Ratings never move a player by themselves.

use crate::models::{LadderError, RatingChange, RatingUpdate, Roster, MAX_RATING};

/// Set one player's rating. Returns the change, or `None` if the rating was already current.
pub fn apply_rating(
    roster: &mut Roster,
    update: &RatingUpdate,
) -> Result<Option<RatingChange>, LadderError> {
    if update.new_rating > u64::from(MAX_RATING) {
        return Err(LadderError::InvalidRating(update.new_rating));
    }
    let new_rating = update.new_rating as u32;
    let player = roster
        .get_mut(update.player_id)
        .ok_or(LadderError::PlayerNotFound(update.player_id))?;
    if player.rating == new_rating {
        return Ok(None);
    }
    let old_rating = player.rating;
    player.rating = new_rating;
    log::info!("Updated {}: {} -> {}", player.full_name(), old_rating, new_rating);
    Ok(Some(RatingChange {
        player_id: player.id,
        name: player.full_name(),
        old_rating,
        new_rating,
    }))
}
