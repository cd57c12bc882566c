//! Integration tests for group formation, group play and the knockout handoff.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use tournament_engine::{
    derive_knockout, form_groups, GroupStage, Opponent, PlayerId, TournamentError,
};
use uuid::Uuid;

fn ids(n: usize) -> Vec<PlayerId> {
    (0..n).map(|_| Uuid::new_v4()).collect()
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Decide every group match; player 1 wins by a margin that grows with the round.
fn play_groups(stage: &mut GroupStage) -> bool {
    let ids: Vec<_> = stage.matches.iter().map(|m| (m.id, m.round)).collect();
    let mut complete = false;
    for (id, round) in ids {
        complete = stage.record_score(id, 10 + round, 5).unwrap().stage_complete;
    }
    complete
}

#[test]
fn group_count_must_leave_two_players_per_group() {
    let players = ids(9);
    assert_eq!(
        form_groups(&players, 1, &mut rng()).unwrap_err(),
        TournamentError::GroupCountOutOfRange { requested: 1, max: 4 }
    );
    assert_eq!(
        form_groups(&players, 5, &mut rng()).unwrap_err(),
        TournamentError::GroupCountOutOfRange { requested: 5, max: 4 }
    );
    assert!(form_groups(&players, 4, &mut rng()).is_ok());
}

#[test]
fn groups_partition_the_roster_evenly() {
    let players = ids(14);
    let stage = form_groups(&players, 3, &mut rng()).unwrap();
    let mut sizes: Vec<_> = stage.groups.iter().map(|g| g.len()).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![4, 5, 5]);

    let members: HashSet<_> = stage.groups.iter().flat_map(|g| g.players.iter().copied()).collect();
    assert_eq!(members, players.iter().copied().collect::<HashSet<_>>());
    assert_eq!(stage.groups[0].name, "Group A");
    assert_eq!(stage.groups[2].name, "Group C");
}

#[test]
fn group_matches_stay_inside_their_group() {
    let stage = form_groups(&ids(10), 2, &mut rng()).unwrap();
    assert_eq!(stage.matches.len(), 2 * 10);
    for group in &stage.groups {
        let members: HashSet<_> = group.players.iter().copied().collect();
        let matches: Vec<_> = stage.group_matches(group.id).collect();
        assert_eq!(matches.len(), 10);
        for m in matches {
            assert!(members.contains(&m.player_1) && members.contains(&m.player_2));
        }
        assert_eq!(stage.standings[&group.id].len(), 5);
    }
}

#[test]
fn stage_completes_only_after_the_last_group_match() {
    let mut stage = form_groups(&ids(8), 2, &mut rng()).unwrap();
    let ids: Vec<_> = stage.matches.iter().map(|m| m.id).collect();
    let (last, rest) = ids.split_last().unwrap();
    for id in rest {
        assert!(!stage.record_score(*id, 3, 1).unwrap().stage_complete);
    }
    assert!(!stage.is_complete());
    let report = stage.record_score(*last, 0, 2).unwrap();
    assert!(report.stage_complete);

    // An edit after completion still reports the stage as complete.
    let report = stage.record_score(*last, 2, 0).unwrap();
    assert!(report.edited && report.stage_complete);
}

#[test]
fn sixteen_players_in_four_groups_feed_eight_and_eight() {
    let players = ids(16);
    let mut stage = form_groups(&players, 4, &mut rng()).unwrap();
    assert_eq!(stage.matches.len(), 24);
    assert!(play_groups(&mut stage));

    let q = stage.qualifiers(&players, &mut rng());
    assert_eq!(q.winners.len(), 4);
    assert_eq!(q.runners_up.len(), 4);
    assert_eq!(q.others.len(), 8);
    for (group, &winner) in stage.groups.iter().zip(&q.winners) {
        assert_eq!(stage.standings[&group.id].ranked()[0].player_id, winner);
    }

    let knockout = derive_knockout(&stage.groups, &stage.standings, &players, &mut rng());
    let main = knockout.main.expect("main bracket");
    let consolation = knockout.consolation.expect("consolation bracket");
    assert_eq!(main.matches.len(), 7);
    assert_eq!(consolation.matches.len(), 7);
    assert_eq!(knockout.main_champion, None);

    let in_main: HashSet<_> = main.round(1).flat_map(|m| [m.slot_1, m.slot_2]).collect();
    let in_consolation: HashSet<_> =
        consolation.round(1).flat_map(|m| [m.slot_1, m.slot_2]).collect();
    assert_eq!(in_main.len(), 8);
    assert!(in_main.is_disjoint(&in_consolation));
    // Group winners hold the canonical seed slots.
    let seeds = main.round(1).next().unwrap();
    assert_eq!(seeds.slot_1, Opponent::Real(q.winners[0]));
}

#[test]
fn three_groups_pad_the_main_bracket_with_byes() {
    let players = ids(9);
    let mut stage = form_groups(&players, 3, &mut rng()).unwrap();
    assert!(play_groups(&mut stage));
    let q = stage.qualifiers(&players, &mut rng());

    let knockout = derive_knockout(&stage.groups, &stage.standings, &players, &mut rng());
    let main = knockout.main.unwrap();
    assert_eq!(main.round(1).count(), 4);
    let byes = main.round(1).filter(|m| m.slot_1.is_bye() || m.slot_2.is_bye()).count();
    assert_eq!(byes, 2);
    // Winners sit at slots 0, 7 and 3, byes at 5 and 6: the second winner walks over.
    let m4 = main.round(1).find(|m| m.match_number == 4).unwrap();
    assert_eq!(m4.winner, Some(q.winners[1]));

    // Three non-qualifiers still make a consolation bracket.
    assert_eq!(knockout.consolation.unwrap().round(1).count(), 2);
}

#[test]
fn two_groups_of_two_leave_no_consolation_bracket() {
    let players = ids(4);
    let mut stage = form_groups(&players, 2, &mut rng()).unwrap();
    assert!(play_groups(&mut stage));
    let knockout = derive_knockout(&stage.groups, &stage.standings, &players, &mut rng());
    assert_eq!(knockout.main.unwrap().matches.len(), 3);
    assert!(knockout.consolation.is_none());
}
