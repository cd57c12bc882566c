//! Integration tests for the tournament lifecycle: roster editing, start, play, reset.

use tournament_engine::{
    configure_groups, report_score, report_score_input, select_knockout_winner, select_winner,
    start_tournament, GroupPhase, KnockoutBracket, Player, Tournament, TournamentError,
    TournamentFormat, TournamentState, MAX_PLAYERS,
};

fn tournament_with_players(n: usize) -> Tournament {
    let mut t = Tournament::new();
    t.quick_add(n).unwrap();
    t
}

/// Select player 1 of every playable match until the bracket is decided.
fn play_out_single_elimination(t: &mut Tournament) {
    loop {
        let next = t
            .bracket
            .as_ref()
            .and_then(|b| b.playable().next().map(|m| (m.id, m.slot_1.player().unwrap())));
        match next {
            Some((id, winner)) => {
                select_winner(t, id, winner).unwrap();
            }
            None => break,
        }
    }
}

#[test]
fn roster_rules_are_enforced() {
    let mut t = Tournament::new();
    t.add_player("  Ann ").unwrap();
    assert_eq!(t.players[0].name, "Ann");
    assert_eq!(t.add_player("ann"), Err(TournamentError::DuplicatePlayerName));
    assert_eq!(t.add_player("   "), Err(TournamentError::EmptyPlayerName));

    let mut full = tournament_with_players(MAX_PLAYERS);
    assert_eq!(
        full.add_player("Extra"),
        Err(TournamentError::PlayerCountOutOfRange { count: MAX_PLAYERS + 1 })
    );
    assert_eq!(full.players[25].name, "Z");
    assert_eq!(full.players[26].name, "AA");
    assert_eq!(full.players[27].name, "AB");
    assert_eq!(t.quick_add(1), Err(TournamentError::PlayerCountOutOfRange { count: 1 }));
}

#[test]
fn at_most_eight_players_can_be_seeded() {
    let mut t = tournament_with_players(10);
    let ids = t.player_ids();
    for &id in &ids[..8] {
        assert_eq!(t.toggle_seed(id), Ok(true));
    }
    assert_eq!(t.toggle_seed(ids[8]), Err(TournamentError::TooManySeeds { count: 9 }));
    assert_eq!(t.toggle_seed(ids[0]), Ok(false));
    assert_eq!(t.toggle_seed(ids[8]), Ok(true));
}

#[test]
fn roster_can_be_imported_from_csv() {
    let mut t = Tournament::new();
    let csv = "name,seeded\nAnn,true\nBob,false\n Cleo ,false\n";
    assert_eq!(t.import_roster_csv(csv.as_bytes()), Ok(3));
    assert_eq!(t.players.len(), 3);
    assert!(t.players[0].seeded);
    assert_eq!(t.players[2].name, "Cleo");

    // A duplicate anywhere rejects the whole file.
    let bad = "name\nDan\nbob\n";
    assert_eq!(t.import_roster_csv(bad.as_bytes()), Err(TournamentError::DuplicatePlayerName));
    assert_eq!(t.players.len(), 3);
}

#[test]
fn a_tournament_needs_two_players() {
    let mut t = Tournament::with_players(vec![Player::new("Solo")]);
    assert_eq!(
        start_tournament(&mut t, TournamentFormat::SingleElimination),
        Err(TournamentError::PlayerCountOutOfRange { count: 1 })
    );
    assert_eq!(t.state, TournamentState::Setup);
    assert!(t.bracket.is_none());
}

#[test]
fn single_elimination_runs_to_a_champion() {
    let mut t = tournament_with_players(6);
    start_tournament(&mut t, TournamentFormat::SingleElimination).unwrap();
    assert_eq!(t.state, TournamentState::InProgress);
    assert_eq!(t.bracket.as_ref().unwrap().matches.len(), 7);
    assert!(t.add_player("Late").is_err());

    play_out_single_elimination(&mut t);
    assert_eq!(t.state, TournamentState::Finished);
    let champion = t.champion.unwrap();
    assert_eq!(t.bracket.as_ref().unwrap().champion(), Some(champion));
}

#[test]
fn seeded_single_elimination_places_seeds_apart() {
    let mut t = tournament_with_players(8);
    let ids = t.player_ids();
    t.toggle_seed(ids[3]).unwrap();
    t.toggle_seed(ids[5]).unwrap();
    t.set_seeding_enabled(true).unwrap();
    start_tournament(&mut t, TournamentFormat::SingleElimination).unwrap();

    let bracket = t.bracket.as_ref().unwrap();
    let first = bracket.round(1).find(|m| m.match_number == 1).unwrap();
    let last = bracket.round(1).find(|m| m.match_number == 4).unwrap();
    assert_eq!(first.slot_1.player(), Some(ids[3]));
    assert_eq!(last.slot_2.player(), Some(ids[5]));
}

#[test]
fn round_robin_finishes_when_every_score_is_in() {
    let mut t = tournament_with_players(4);
    start_tournament(&mut t, TournamentFormat::RoundRobin).unwrap();
    let matches = t.round_robin.as_ref().unwrap().matches.clone();
    assert_eq!(matches.len(), 6);

    assert!(matches!(
        report_score_input(&mut t, matches[0].id, "ten", "3"),
        Err(TournamentError::InvalidScore(_))
    ));
    assert_eq!(report_score(&mut t, matches[0].id, 4, 4), Err(TournamentError::EqualScores));
    assert!(!t.round_robin.as_ref().unwrap().matches[0].is_decided());

    for m in &matches {
        assert_eq!(t.state, TournamentState::InProgress);
        report_score_input(&mut t, m.id, "11", " 7").unwrap();
    }
    assert_eq!(t.state, TournamentState::Finished);
    let pool = t.round_robin.as_ref().unwrap();
    assert_eq!(t.champion, Some(pool.standings.final_ranked()[0].player_id));
}

#[test]
fn group_knockout_moves_from_groups_to_brackets() {
    let mut t = tournament_with_players(12);
    start_tournament(&mut t, TournamentFormat::GroupKnockout).unwrap();
    assert_eq!(t.state, TournamentState::GroupConfig);
    assert_eq!(
        configure_groups(&mut t, 7),
        Err(TournamentError::GroupCountOutOfRange { requested: 7, max: 6 })
    );
    configure_groups(&mut t, 3).unwrap();
    assert_eq!(t.state, TournamentState::InProgress);
    assert_eq!(t.group_phase, GroupPhase::Groups);

    let matches = t.group_stage.as_ref().unwrap().matches.clone();
    assert_eq!(matches.len(), 18);
    for m in &matches {
        assert!(t.knockout.is_none());
        report_score(&mut t, m.id, 5, 2).unwrap();
    }
    assert_eq!(t.group_phase, GroupPhase::Knockout);
    let knockout = t.knockout.clone().unwrap();
    assert!(knockout.main.is_some());
    assert!(knockout.consolation.is_some());

    // Group scores are frozen once the knockout has started.
    assert_eq!(report_score(&mut t, matches[0].id, 1, 9), Err(TournamentError::InvalidState));

    // Consolation results never finish the tournament.
    loop {
        let next = t.knockout.as_ref().and_then(|k| {
            k.consolation
                .as_ref()?
                .playable()
                .next()
                .map(|m| (m.id, m.slot_2.player().unwrap()))
        });
        let Some((id, winner)) = next else { break };
        select_knockout_winner(&mut t, KnockoutBracket::Consolation, id, winner).unwrap();
    }
    assert_eq!(t.state, TournamentState::InProgress);
    assert!(t.knockout.as_ref().unwrap().consolation_champion.is_some());

    loop {
        let next = t.knockout.as_ref().and_then(|k| {
            k.main
                .as_ref()?
                .playable()
                .next()
                .map(|m| (m.id, m.slot_1.player().unwrap()))
        });
        let Some((id, winner)) = next else { break };
        select_knockout_winner(&mut t, KnockoutBracket::Main, id, winner).unwrap();
    }
    assert_eq!(t.state, TournamentState::Finished);
    assert_eq!(t.champion, t.knockout.as_ref().unwrap().main_champion);
}

#[test]
fn back_to_setup_keeps_the_roster_and_reset_clears_it() {
    let mut t = tournament_with_players(5);
    t.set_seeding_enabled(true).unwrap();
    start_tournament(&mut t, TournamentFormat::RoundRobin).unwrap();
    let id = t.id;

    t.back_to_setup();
    assert_eq!(t.state, TournamentState::Setup);
    assert_eq!(t.players.len(), 5);
    assert!(t.seeding_enabled);
    assert!(t.round_robin.is_none());
    assert_eq!(t.id, id);

    t.reset();
    assert!(t.players.is_empty());
    assert!(!t.seeding_enabled);
    assert_eq!(t.id, id);
}
