//! Ladder business logic: candidate scan, promotion, position upkeep, ratings.

mod positions;
mod promotion;
mod ratings;

pub use positions::{fix_positions, reindex_ladder};
pub use promotion::{check_promotion_candidates, promote_player};
pub use ratings::apply_rating;
