//! Integration tests for promotion: candidate scan, moving players up, closing gaps.

use pool_ladder::{
    check_promotion_candidates, promote_player, LadderError, LadderName, Player, PlayerId, Roster,
};

const LOW: LadderName = LadderName::Under500;
const MID: LadderName = LadderName::From500To549;
const HIGH: LadderName = LadderName::Plus550;

/// `n` active players on `ladder` at positions 1..=n, all rated `rating`.
fn ladder_of(ladder: LadderName, n: u32, rating: u32) -> Vec<Player> {
    (1..=n)
        .map(|i| Player::new(format!("P{i}"), ladder.as_str(), rating, ladder, i))
        .collect()
}

fn positions(roster: &Roster, ladder: LadderName) -> Vec<u32> {
    roster.active_in(ladder).iter().map(|p| p.position).collect()
}

fn id_at(roster: &Roster, ladder: LadderName, position: u32) -> PlayerId {
    roster
        .active_in(ladder)
        .iter()
        .find(|p| p.position == position)
        .map(|p| p.id)
        .unwrap()
}

fn set_rating(roster: &mut Roster, id: PlayerId, rating: u32) {
    roster.get_mut(id).unwrap().rating = rating;
}

#[test]
fn promoting_middle_player_closes_gap_and_appends_to_empty_ladder() {
    let mut roster = Roster::from_players(ladder_of(LOW, 5, 450));
    let mover = id_at(&roster, LOW, 3);
    let old_4 = id_at(&roster, LOW, 4);
    let old_5 = id_at(&roster, LOW, 5);
    set_rating(&mut roster, mover, 520);

    let record = promote_player(&mut roster, mover).unwrap();

    assert_eq!(positions(&roster, LOW), vec![1, 2, 3, 4]);
    assert_eq!(roster.get(old_4).unwrap().position, 3);
    assert_eq!(roster.get(old_5).unwrap().position, 4);
    assert_eq!(positions(&roster, MID), vec![1]);

    let moved = roster.get(mover).unwrap();
    assert_eq!(moved.ladder_name, MID);
    assert_eq!(moved.position, 1);

    assert_eq!(record.from_ladder, LOW);
    assert_eq!(record.to_ladder, MID);
    assert_eq!(record.old_position, 3);
    assert_eq!(record.new_position, 1);
    assert_eq!(record.reindexed_count, 2);
    assert_eq!(record.rating, 520);
}

#[test]
fn two_promotions_in_order_land_in_arrival_order() {
    let mut roster = Roster::from_players(ladder_of(LOW, 5, 450));
    let first = id_at(&roster, LOW, 2);
    let second = id_at(&roster, LOW, 4);
    set_rating(&mut roster, first, 510);
    set_rating(&mut roster, second, 530);

    let r1 = promote_player(&mut roster, first).unwrap();
    let r2 = promote_player(&mut roster, second).unwrap();

    assert_eq!(r1.new_position, 1);
    assert_eq!(r2.new_position, 2);
    // Originally 4, but the first promotion already moved it up one.
    assert_eq!(r2.old_position, 3);
    assert_eq!(positions(&roster, LOW), vec![1, 2, 3]);
    assert_eq!(positions(&roster, MID), vec![1, 2]);
}

#[test]
fn removal_shifts_exactly_the_players_below() {
    let n = 6;
    for p in 1..=n {
        let mut roster = Roster::from_players(ladder_of(LOW, n, 400));
        let mover = id_at(&roster, LOW, p);
        set_rating(&mut roster, mover, 560);
        let before = roster.clone();

        let record = promote_player(&mut roster, mover).unwrap();

        assert_eq!(record.reindexed_count, (n - p) as usize);
        for old in before.active_in(LOW).iter().filter(|x| x.id != mover) {
            let now = roster.get(old.id).unwrap().position;
            if old.position > p {
                assert_eq!(now, old.position - 1);
            } else {
                assert_eq!(now, old.position);
            }
        }
        assert!(roster.is_dense(LOW));
    }
}

#[test]
fn appends_after_existing_destination_players() {
    let mut players = ladder_of(LOW, 3, 450);
    players.extend(ladder_of(MID, 4, 520));
    let mut roster = Roster::from_players(players);
    let mover = id_at(&roster, LOW, 1);
    set_rating(&mut roster, mover, 505);

    let record = promote_player(&mut roster, mover).unwrap();

    assert_eq!(record.new_position, 5);
    assert_eq!(positions(&roster, MID), vec![1, 2, 3, 4, 5]);
    assert_eq!(positions(&roster, LOW), vec![1, 2]);
}

#[test]
fn destination_gaps_are_closed_too() {
    let mut players = ladder_of(LOW, 2, 450);
    let mut mid = ladder_of(MID, 3, 520);
    mid[2].position = 7;
    players.extend(mid);
    let mut roster = Roster::from_players(players);
    let mover = id_at(&roster, LOW, 2);
    set_rating(&mut roster, mover, 500);

    let record = promote_player(&mut roster, mover).unwrap();

    assert_eq!(positions(&roster, MID), vec![1, 2, 3, 4]);
    assert_eq!(record.new_position, 4);
}

#[test]
fn large_rating_jump_skips_straight_to_matching_ladder() {
    let mut roster = Roster::from_players(ladder_of(LOW, 3, 450));
    let mover = id_at(&roster, LOW, 1);
    set_rating(&mut roster, mover, 612);

    let record = promote_player(&mut roster, mover).unwrap();

    assert_eq!(record.to_ladder, HIGH);
    assert!(positions(&roster, MID).is_empty());
    assert_eq!(positions(&roster, HIGH), vec![1]);
}

#[test]
fn promotion_only_moves_up() {
    let mut players = ladder_of(LOW, 4, 450);
    players.extend(ladder_of(MID, 4, 520));
    let mut roster = Roster::from_players(players);
    let updates = [
        (id_at(&roster, LOW, 2), 530),
        (id_at(&roster, LOW, 3), 700),
        (id_at(&roster, MID, 1), 580),
        // Dropped below the band: must not be demoted.
        (id_at(&roster, MID, 4), 300),
    ];
    for (id, rating) in updates {
        set_rating(&mut roster, id, rating);
    }

    let ids: Vec<PlayerId> = check_promotion_candidates(&roster)
        .iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids.len(), 3);
    for id in ids {
        let record = promote_player(&mut roster, id).unwrap();
        assert!(record.to_ladder > record.from_ladder);
    }
    for ladder in LadderName::ALL {
        assert!(roster.is_dense(ladder));
    }
    assert!(check_promotion_candidates(&roster).is_empty());
}

#[test]
fn candidates_skip_inactive_and_demotions_and_are_sorted() {
    let mut players = ladder_of(LOW, 4, 450);
    players.extend(ladder_of(MID, 3, 520));
    players.extend(ladder_of(HIGH, 2, 600));
    let mut roster = Roster::from_players(players);

    let low_4 = id_at(&roster, LOW, 4);
    let low_1 = id_at(&roster, LOW, 1);
    let low_2 = id_at(&roster, LOW, 2);
    let mid_2 = id_at(&roster, MID, 2);
    set_rating(&mut roster, low_4, 540);
    set_rating(&mut roster, low_1, 560);
    set_rating(&mut roster, low_2, 505);
    roster.get_mut(low_2).unwrap().is_active = false;
    set_rating(&mut roster, mid_2, 551);
    let high_1 = id_at(&roster, HIGH, 1);
    set_rating(&mut roster, high_1, 420);

    let candidates = check_promotion_candidates(&roster);

    let summary: Vec<(PlayerId, LadderName, LadderName, u32)> = candidates
        .iter()
        .map(|c| (c.id, c.current_ladder, c.target_ladder, c.position))
        .collect();
    assert_eq!(
        summary,
        vec![
            (low_1, LOW, HIGH, 1),
            (low_4, LOW, MID, 4),
            (mid_2, MID, HIGH, 2),
        ]
    );
}

#[test]
fn check_does_not_mutate() {
    let mut roster = Roster::from_players(ladder_of(LOW, 3, 450));
    let id = id_at(&roster, LOW, 2);
    set_rating(&mut roster, id, 520);
    let before = roster.clone();
    let _ = check_promotion_candidates(&roster);
    assert_eq!(roster, before);
}

#[test]
fn unknown_player_is_not_found() {
    let mut roster = Roster::from_players(ladder_of(LOW, 2, 450));
    let missing = uuid::Uuid::new_v4();
    assert!(matches!(
        promote_player(&mut roster, missing),
        Err(LadderError::PlayerNotFound(id)) if id == missing
    ));
}

#[test]
fn ineligible_player_is_rejected_without_changes() {
    let mut roster = Roster::from_players(ladder_of(LOW, 3, 450));
    let before = roster.clone();
    let id = id_at(&roster, LOW, 2);

    assert!(matches!(
        promote_player(&mut roster, id),
        Err(LadderError::NotEligible { ladder: LOW, rating: 450, .. })
    ));
    assert_eq!(roster, before);
}

#[test]
fn inactive_player_is_rejected() {
    let mut roster = Roster::from_players(ladder_of(LOW, 3, 450));
    let id = id_at(&roster, LOW, 3);
    set_rating(&mut roster, id, 520);
    roster.get_mut(id).unwrap().is_active = false;

    assert!(matches!(
        promote_player(&mut roster, id),
        Err(LadderError::Inactive(_))
    ));
}

#[test]
fn full_destination_is_an_error_not_a_panic() {
    let mut players = ladder_of(LOW, 2, 450);
    let mut mid = ladder_of(MID, 1, 520);
    mid[0].position = u32::MAX;
    players.extend(mid);
    let mut roster = Roster::from_players(players);
    let mover = id_at(&roster, LOW, 1);
    set_rating(&mut roster, mover, 510);
    let before = roster.clone();

    assert!(matches!(
        promote_player(&mut roster, mover),
        Err(LadderError::PositionOverflow(MID))
    ));
    assert_eq!(roster, before);
}
