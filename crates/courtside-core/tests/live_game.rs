//! A short game played through the public session API.

#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]

use courtside_core::clock::TickOutcome;
use courtside_core::config::{CourtsideConfig, GameRulesConfig};
use courtside_core::session::LiveSession;
use courtside_core::store::{EventStore, GameMetaStore, InMemoryStore, new_game_meta};
use courtside_replay::{ClockReading, detect_starters, seconds_played, team_totals};
use courtside_types::{CarryOverPolicy, EventType, GameId, PlayerId, RosterPlayer};

fn roster() -> Vec<RosterPlayer> {
    (4..=12)
        .map(|number| RosterPlayer {
            id: PlayerId::new(),
            name: format!("#{number}"),
            number,
        })
        .collect()
}

fn open(rules: &GameRulesConfig) -> (LiveSession<InMemoryStore>, Vec<PlayerId>, GameId) {
    let mut store = InMemoryStore::new();
    let meta = new_game_meta("Harbour City", 7, None, roster(), rules);
    let ids: Vec<PlayerId> = meta.roster.iter().map(|p| p.id).collect();
    let game = store.add_game(meta);
    (LiveSession::open(store, game, rules).unwrap(), ids, game)
}

fn run(session: &mut LiveSession<InMemoryStore>, seconds: u32) -> TickOutcome {
    if !session.clock().is_running() {
        session.toggle_clock();
    }
    let mut last = TickOutcome::Idle;
    for _ in 0..seconds {
        last = session.tick().unwrap();
    }
    last
}

#[test]
fn two_quarter_game_with_manual_carry_over() {
    let config = CourtsideConfig::parse(
        "game:\n  quarter_length_sec: 120\n  quarters_count: 2\n  carry_over: manual\n",
    )
    .unwrap();
    let (mut s, p, game) = open(&config.game);

    for id in &p[..5] {
        s.sub_in(*id).unwrap();
    }
    run(&mut s, 10);
    s.select_player(p[0]);
    s.add_event(EventType::TwoMade, None, false).unwrap();
    s.add_event(EventType::Ast, Some(p[1]), false).unwrap();
    run(&mut s, 20);
    s.add_event(EventType::OppThreeMade, None, false).unwrap();
    s.sub_out(p[4]).unwrap();
    s.sub_in(p[5]).unwrap();
    s.add_event(EventType::Pf, Some(p[5]), false).unwrap();

    assert_eq!(run(&mut s, 90), TickOutcome::QuarterExpired { period: 1 });
    assert!(s.view().unwrap().on_court.is_empty());

    assert!(s.next_quarter().unwrap());
    for id in &p[..5] {
        s.sub_in(*id).unwrap();
    }
    assert_eq!(s.view().unwrap().team_fouls_this_period, 0);
    run(&mut s, 60);
    s.add_event(EventType::ThreeMade, Some(p[2]), false).unwrap();
    assert_eq!(run(&mut s, 60), TickOutcome::QuarterExpired { period: 2 });
    assert!(!s.next_quarter().unwrap());

    // Buzzers already closed every interval.
    assert_eq!(s.repair_boundaries().unwrap(), 0);

    let board = s.end_game().unwrap();
    assert_eq!((board.team, board.opponent), (5, 3));

    let view = s.view().unwrap();
    assert!(view.game_over);
    assert_eq!(view.seconds_played.get(&p[0]), Some(&240));
    assert_eq!(view.seconds_played.get(&p[4]), Some(&(30 + 120)));
    assert_eq!(view.seconds_played.get(&p[5]), Some(&90));
    assert_eq!(view.plus_minus.get(&p[0]), Some(&2));
    assert_eq!(view.plus_minus.get(&p[5]), Some(&0));

    let store = s.into_store();
    let meta = store.game(game).unwrap().unwrap();
    assert_eq!(meta.final_team_score, Some(5));

    let events = store.events_for_game(game).unwrap();
    let seconds = seconds_played(&events, 120, ClockReading::final_buzzer(2));
    let totals = team_totals(&view.box_scores, &seconds);
    assert_eq!(totals.total_sec, 10 * 120);
    assert_eq!(totals.line.pts, 5);
    assert_eq!(totals.line.ast, 1);
    let starters: Vec<PlayerId> = detect_starters(&events).into_iter().collect();
    let mut expected = p[..5].to_vec();
    expected.sort();
    assert_eq!(starters, expected);
}

#[test]
fn reopen_policy_keeps_the_lineup_between_quarters() {
    let rules = GameRulesConfig {
        quarter_length_sec: 60,
        quarters_count: 3,
        carry_over: CarryOverPolicy::Reopen,
    };
    let (mut s, p, _) = open(&rules);
    for id in &p[..5] {
        s.sub_in(*id).unwrap();
    }
    run(&mut s, 60);
    s.next_quarter().unwrap();
    assert_eq!(s.view().unwrap().on_court.len(), 5);
    run(&mut s, 60);
    s.next_quarter().unwrap();
    run(&mut s, 60);

    // Final buzzer never reopens.
    let view = s.view().unwrap();
    assert!(view.on_court.is_empty());
    assert!(view.seconds_played.values().all(|secs| *secs == 180));
}

#[test]
fn hand_advanced_quarters_are_repaired() {
    let rules = GameRulesConfig::default();
    let (mut s, p, _) = open(&rules);
    for id in &p[..5] {
        s.sub_in(*id).unwrap();
    }
    run(&mut s, 100);
    s.toggle_clock();
    // Scorer skips to the next quarter without letting the clock run out.
    s.next_quarter().unwrap();
    run(&mut s, 50);

    let before = s.view().unwrap();
    assert_eq!(before.seconds_played.get(&p[0]), Some(&650));
    assert_eq!(before.on_court.len(), 5);

    // Out at the end of period 1 and back in for period 2. Period 2 is
    // still being played, so nobody is closed out of it yet.
    assert_eq!(s.repair_boundaries().unwrap(), 10);
    let during = s.view().unwrap();
    assert_eq!(during.on_court.len(), 5);
    assert_eq!(during.seconds_played.get(&p[0]), Some(&650));
    assert_eq!(s.repair_boundaries().unwrap(), 0);

    // Once the game is over the open period is closed as well.
    s.end_game().unwrap();
    assert_eq!(s.repair_boundaries().unwrap(), 5);
    let after = s.view().unwrap();
    assert!(after.on_court.is_empty());
    assert_eq!(after.seconds_played.get(&p[0]), Some(&1200));
    assert_eq!(s.repair_boundaries().unwrap(), 0);
}
