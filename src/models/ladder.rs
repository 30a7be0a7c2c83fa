//! Ladder tiers and their rating bands.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest rating a player record may carry.
pub const MAX_RATING: u32 = 9999;

/// A ladder tier. Declaration order is tier order: lower tiers compare less than higher ones.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum LadderName {
    /// Ratings 0..=499.
    #[serde(rename = "499-under")]
    Under500,
    /// Ratings 500..=549.
    #[serde(rename = "500-549")]
    From500To549,
    /// Ratings 550 and up (open-ended).
    #[serde(rename = "550-plus")]
    Plus550,
}

impl LadderName {
    /// Every tier, lowest first.
    pub const ALL: [LadderName; 3] = [
        LadderName::Under500,
        LadderName::From500To549,
        LadderName::Plus550,
    ];

    /// Wire name, e.g. `"500-549"`.
    pub fn as_str(self) -> &'static str {
        match self {
            LadderName::Under500 => "499-under",
            LadderName::From500To549 => "500-549",
            LadderName::Plus550 => "550-plus",
        }
    }

    /// Lowest rating (inclusive) of this tier's band.
    pub fn min_rating(self) -> u32 {
        match self {
            LadderName::Under500 => 0,
            LadderName::From500To549 => 500,
            LadderName::Plus550 => 550,
        }
    }

    /// Highest rating (inclusive) of this tier's band.
    pub fn max_rating(self) -> u32 {
        match self {
            LadderName::Under500 => 499,
            LadderName::From500To549 => 549,
            LadderName::Plus550 => MAX_RATING,
        }
    }

    /// The tier whose band contains `rating`. Anything above the top band lands in the top tier.
    pub fn for_rating(rating: u32) -> LadderName {
        Self::ALL
            .into_iter()
            .find(|l| rating >= l.min_rating() && rating <= l.max_rating())
            .unwrap_or(LadderName::Plus550)
    }

    /// Tier a player on this ladder should move to for `rating`.
    ///
    /// Jumps straight to the tier matching the rating, possibly skipping a tier.
    /// Returns `None` when the rating implies this tier or a lower one.
    pub fn promotion_target(self, rating: u32) -> Option<LadderName> {
        let implied = Self::for_rating(rating);
        (implied > self).then_some(implied)
    }
}

impl fmt::Display for LadderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the ladder wire names.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownLadder(pub String);

impl fmt::Display for UnknownLadder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown ladder: {}", self.0)
    }
}

impl std::error::Error for UnknownLadder {}

impl FromStr for LadderName {
    type Err = UnknownLadder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str() == s.trim())
            .ok_or_else(|| UnknownLadder(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges() {
        assert_eq!(LadderName::for_rating(0), LadderName::Under500);
        assert_eq!(LadderName::for_rating(499), LadderName::Under500);
        assert_eq!(LadderName::for_rating(500), LadderName::From500To549);
        assert_eq!(LadderName::for_rating(549), LadderName::From500To549);
        assert_eq!(LadderName::for_rating(550), LadderName::Plus550);
        assert_eq!(LadderName::for_rating(12_000), LadderName::Plus550);
    }

    #[test]
    fn promotion_target_never_goes_down() {
        assert_eq!(LadderName::Plus550.promotion_target(300), None);
        assert_eq!(LadderName::From500To549.promotion_target(520), None);
        assert_eq!(
            LadderName::Under500.promotion_target(560),
            Some(LadderName::Plus550)
        );
    }

    #[test]
    fn parses_wire_names() {
        assert_eq!("500-549".parse::<LadderName>(), Ok(LadderName::From500To549));
        assert!("600-plus".parse::<LadderName>().is_err());
    }
}
