//! Position upkeep: keep each ladder's active positions dense and ordered.

use crate::models::{LadderFix, LadderName, PlayerId, Roster};

/// Renumber `ladder`'s active players 1..=N in their current order.
///
/// Every change to ladder membership goes through here. Returns how many players
/// got a new position; a dense ladder is left untouched and returns 0.
pub fn reindex_ladder(roster: &mut Roster, ladder: LadderName) -> usize {
    let ordered: Vec<(PlayerId, u32)> = roster
        .active_in(ladder)
        .iter()
        .map(|p| (p.id, p.position))
        .collect();

    let mut changed = 0;
    for (i, (id, old_position)) in ordered.into_iter().enumerate() {
        let expected = i as u32 + 1;
        if old_position == expected {
            continue;
        }
        if let Some(p) = roster.get_mut(id) {
            log::debug!(
                "{}: {} position {} -> {}",
                ladder,
                p.full_name(),
                old_position,
                expected
            );
            p.position = expected;
            changed += 1;
        }
    }
    changed
}

/// Compress every ladder independently. No one changes ladder.
pub fn fix_positions(roster: &mut Roster) -> Vec<LadderFix> {
    LadderName::ALL
        .into_iter()
        .map(|ladder| {
            let total_players = roster.active_in(ladder).len();
            let fixed_positions = reindex_ladder(roster, ladder);
            if fixed_positions > 0 {
                log::info!("Fixed {} positions in {}", fixed_positions, ladder);
            }
            LadderFix {
                ladder,
                total_players,
                fixed_positions,
            }
        })
        .collect()
}
