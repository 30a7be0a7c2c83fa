//! Data structures for the ladder: tiers, players, the roster, promotion and rating reports.

mod ladder;
mod player;
mod promotion;
mod rating;
mod roster;

pub use ladder::{LadderName, UnknownLadder, MAX_RATING};
pub use player::{Player, PlayerId};
pub use promotion::{
    CandidateEntry, CandidateRef, LadderFix, PromotionCandidate, PromotionFailure,
    PromotionOutcome, PromotionRecord, PromotionReport,
};
pub use rating::{RatingChange, RatingUpdate, RatingUpdateEntry, RatingUpdateReport};
pub use roster::{LadderError, Roster};
