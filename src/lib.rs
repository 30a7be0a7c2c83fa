//! Pool league ladder service: library with models, ranking logic, storage and HTTP handlers.

pub mod api;
pub mod config;
pub mod import;
pub mod logic;
pub mod models;
pub mod service;
pub mod store;

pub use logic::{
    apply_rating, check_promotion_candidates, fix_positions, promote_player, reindex_ladder,
};
pub use models::{
    CandidateEntry, CandidateRef, LadderError, LadderFix, LadderName, Player, PlayerId,
    PromotionCandidate, PromotionFailure, PromotionOutcome, PromotionRecord, PromotionReport,
    RatingChange, RatingUpdate, RatingUpdateEntry, RatingUpdateReport, Roster, MAX_RATING,
};
pub use service::LadderService;
pub use store::{JsonFileStore, MemoryStore, PlayerStore, StoreError};
