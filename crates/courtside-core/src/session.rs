//! The command layer for one live game.
//!
//! [`LiveSession`] is the single writer for a game's log. It owns the clock
//! and the selected player, turns scorer commands into events, and appends
//! them through the [`EventStore`]. It never caches derived state: every
//! check (who is on court, the current score) is recomputed from the log.
//!
//! Invalid commands are soft no-ops. They log a `warn!` diagnostic and
//! return `Ok(None)` / `Ok(false)`, leaving the log untouched. Only store
//! failures are errors.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeDelta, Utc};
use courtside_replay::{
    BoundaryFix, ClockReading, MAX_ON_COURT, Scoreboard, compare_game_time, on_court_ids,
    plan_boundary_repairs, scoreboard,
};
use courtside_types::{
    CarryOverPolicy, Event, EventType, GameId, GameMeta, LiveView, NewEvent, PlayerId,
};
use tracing::{debug, info, warn};

use crate::clock::{ClockError, LiveClock, TickOutcome};
use crate::config::GameRulesConfig;
use crate::projection::build_view;
use crate::store::{EventStore, GameMetaStore, StoreError};

/// Errors from session commands.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The game record does not exist.
    #[error("game not found: {0}")]
    GameNotFound(GameId),

    /// The store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The game record carries unusable rules.
    #[error("clock error: {0}")]
    Clock(#[from] ClockError),
}

/// Live tracking session for one game.
#[derive(Debug)]
pub struct LiveSession<S> {
    store: S,
    meta: GameMeta,
    clock: LiveClock,
    selected: Option<PlayerId>,
    carry_over: CarryOverPolicy,
    last_created_at: Option<DateTime<Utc>>,
    pending_close: Option<PendingClose>,
}

/// A buzzer close-out that has not fully reached the log.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingClose {
    period: u32,
    /// Who was on court at the buzzer. Captured before the first write.
    lineup: Option<BTreeSet<PlayerId>>,
}

impl<S: EventStore + GameMetaStore> LiveSession<S> {
    /// Open a session for an existing game.
    ///
    /// The clock comes from the game record. If the log already has events
    /// (a resumed game) the paused clock is placed at the reading of the
    /// latest event in game order.
    pub fn open(store: S, game_id: GameId, rules: &GameRulesConfig) -> Result<Self, SessionError> {
        let meta = store
            .game(game_id)?
            .ok_or(SessionError::GameNotFound(game_id))?;
        let mut clock = LiveClock::from_parts(meta.quarter_length_sec, meta.quarters_count)?;

        let events = store.events_for_game(game_id)?;
        let last_in_game = events
            .iter()
            .max_by(|a, b| compare_game_time(a, b));
        if let Some(last) = last_in_game {
            clock.resume_at(ClockReading::new(last.period, last.clock_sec_remaining));
        }
        let last_created_at = events.iter().map(|e| e.created_at).max();

        info!(
            game_id = %game_id,
            opponent = %meta.opponent_name,
            events = events.len(),
            period = clock.period(),
            "Live session opened"
        );

        Ok(Self {
            store,
            meta,
            clock,
            selected: None,
            carry_over: rules.carry_over,
            last_created_at,
            pending_close: None,
        })
    }

    // -----------------------------------------------------------------------
    // Selection and clock
    // -----------------------------------------------------------------------

    /// Select the player that stat buttons apply to. Players not on the
    /// game roster are ignored.
    pub fn select_player(&mut self, player_id: PlayerId) -> bool {
        if !self.meta.roster.iter().any(|p| p.id == player_id) {
            warn!(player_id = %player_id, "Ignoring selection of a player not on the roster");
            return false;
        }
        self.selected = Some(player_id);
        true
    }

    /// Start or stop the clock. Returns whether it is now running; a clock
    /// at zero stays stopped.
    pub fn toggle_clock(&mut self) -> bool {
        self.clock.toggle()
    }

    /// Put the full quarter back on a stopped clock.
    pub const fn reset_quarter(&mut self) {
        self.clock.reset_quarter();
    }

    /// Advance the clock by one second. When the quarter expires, every
    /// player on court is subbed out at zero for the expiring period and,
    /// under [`CarryOverPolicy::Reopen`], subbed back in at the start of
    /// the next one.
    ///
    /// If the store fails during that close-out the clock still stops at
    /// zero, and every later tick retries the close-out until it lands. The
    /// tick that completes it reports [`TickOutcome::QuarterExpired`].
    pub fn tick(&mut self) -> Result<TickOutcome, SessionError> {
        if let Some(period) = self.finish_pending_close()? {
            return Ok(TickOutcome::QuarterExpired { period });
        }
        let outcome = self.clock.tick();
        if let TickOutcome::QuarterExpired { period } = outcome {
            self.pending_close = Some(PendingClose {
                period,
                lineup: None,
            });
            self.finish_pending_close()?;
        }
        Ok(outcome)
    }

    /// Whether a buzzer close-out is still waiting to be written.
    pub const fn close_out_pending(&self) -> bool {
        self.pending_close.is_some()
    }

    fn finish_pending_close(&mut self) -> Result<Option<u32>, SessionError> {
        let Some(PendingClose { period, lineup }) = self.pending_close.clone() else {
            return Ok(None);
        };
        let lineup = match lineup {
            Some(lineup) => lineup,
            None => {
                let lineup = on_court_ids(&self.events()?);
                info!(period, players = lineup.len(), "Quarter expired");
                self.pending_close = Some(PendingClose {
                    period,
                    lineup: Some(lineup.clone()),
                });
                lineup
            }
        };
        self.close_out(period, &lineup)?;
        self.pending_close = None;
        Ok(Some(period))
    }

    /// Sub the buzzer lineup out at zero and, under the reopen policy, back
    /// in at the next tip. Writes only what an earlier attempt left out.
    fn close_out(
        &mut self,
        period: u32,
        lineup: &BTreeSet<PlayerId>,
    ) -> Result<(), SessionError> {
        let through_buzzer: Vec<Event> = self
            .events()?
            .into_iter()
            .filter(|e| e.period <= period)
            .collect();
        let still_on = on_court_ids(&through_buzzer);
        for &player_id in lineup.intersection(&still_on) {
            self.append(Some(player_id), EventType::SubOut, period, 0)?;
        }

        let reopen = self.carry_over == CarryOverPolicy::Reopen && period < self.meta.quarters_count;
        if reopen {
            let next = period.saturating_add(1);
            let start = self.meta.quarter_length_sec;
            let back_on = on_court_ids(&self.events()?);
            for &player_id in lineup.difference(&back_on) {
                self.append(Some(player_id), EventType::SubIn, next, start)?;
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Event commands
    // -----------------------------------------------------------------------

    /// Record an event at the current clock reading.
    ///
    /// The player is resolved as: none for opponent events, none when
    /// `no_player` is set, otherwise `player_override`, otherwise the
    /// selected player. If the type needs a player and none resolves the
    /// command is dropped. Substitutions are checked against the court: a
    /// sub-in is dropped for a player already on court or when five are,
    /// a sub-out for a player who is not on court.
    pub fn add_event(
        &mut self,
        event_type: EventType,
        player_override: Option<PlayerId>,
        no_player: bool,
    ) -> Result<Option<Event>, SessionError> {
        let player_id = if event_type.is_opponent_event() || no_player {
            None
        } else {
            player_override.or(self.selected)
        };
        if event_type.requires_player() && player_id.is_none() {
            warn!(event_type = %event_type, "No player selected; event dropped");
            return Ok(None);
        }
        if let Some(player_id) = player_id {
            if !self.substitution_allowed(event_type, player_id)? {
                return Ok(None);
            }
        }
        let event = self.append(
            player_id,
            event_type,
            self.clock.period(),
            self.clock.sec_remaining(),
        )?;
        Ok(Some(event))
    }

    /// Sub a player in at the current reading. Dropped if the player is
    /// already on court or five others are.
    pub fn sub_in(&mut self, player_id: PlayerId) -> Result<Option<Event>, SessionError> {
        self.add_event(EventType::SubIn, Some(player_id), false)
    }

    /// Sub a player out at the current reading. Dropped if the player is
    /// not on court.
    pub fn sub_out(&mut self, player_id: PlayerId) -> Result<Option<Event>, SessionError> {
        self.add_event(EventType::SubOut, Some(player_id), false)
    }

    fn substitution_allowed(
        &self,
        event_type: EventType,
        player_id: PlayerId,
    ) -> Result<bool, StoreError> {
        if !event_type.is_substitution() {
            return Ok(true);
        }
        let on_court = on_court_ids(&self.events()?);
        let on = on_court.contains(&player_id);
        if event_type == EventType::SubOut {
            if !on {
                warn!(player_id = %player_id, "Player is not on court");
            }
            return Ok(on);
        }
        if on {
            warn!(player_id = %player_id, "Player already on court");
            return Ok(false);
        }
        if on_court.len() >= MAX_ON_COURT {
            warn!(player_id = %player_id, on_court = on_court.len(), "Court is full; sub-in dropped");
            return Ok(false);
        }
        Ok(true)
    }

    /// End the current period: a period-end marker at the current reading,
    /// the clock moves on, then a period-start marker at the new tip.
    /// Returns `false` in the final period.
    pub fn next_quarter(&mut self) -> Result<bool, SessionError> {
        if self.clock.is_final_period() {
            warn!(period = self.clock.period(), "Already in the final period");
            return Ok(false);
        }
        self.finish_pending_close()?;
        self.add_event(EventType::PeriodEnd, None, true)?;
        self.clock.next_quarter();
        self.add_event(EventType::PeriodStart, None, true)?;
        info!(period = self.clock.period(), "Period started");
        Ok(true)
    }

    /// Remove the most recently *recorded* event, whatever its place in
    /// game time.
    // TODO: decide with scorers whether undo should instead follow game
    // order once late entries are common.
    pub fn undo_last(&mut self) -> Result<Option<Event>, SessionError> {
        let removed = self.store.delete_most_recently_created(self.meta.id)?;
        match &removed {
            Some(event) => debug!(event_id = %event.id, event_type = %event.event_type, "Undid event"),
            None => warn!("Nothing to undo"),
        }
        Ok(removed)
    }

    /// Stop the clock and store the final score computed from the log.
    pub fn end_game(&mut self) -> Result<Scoreboard, SessionError> {
        self.clock.pause();
        let board = scoreboard(&self.events()?);
        self.store
            .persist_final_score(self.meta.id, board.team, board.opponent)?;
        self.meta.final_team_score = Some(board.team);
        self.meta.final_opponent_score = Some(board.opponent);
        info!(
            game_id = %self.meta.id,
            team = board.team,
            opponent = board.opponent,
            "Game ended"
        );
        Ok(board)
    }

    /// Insert the boundary substitutions missing from the log. Returns how
    /// many events were added; a second run adds none.
    ///
    /// While the current period is still being played (the game has not
    /// ended and the clock is above zero) its buzzer sub-outs are held
    /// back, since they would credit seconds nobody has played yet. Running
    /// the repair again after [`end_game`](Self::end_game) adds them.
    pub fn repair_boundaries(&mut self) -> Result<usize, SessionError> {
        let open_period = self.open_period();
        let fixes: Vec<BoundaryFix> = plan_boundary_repairs(
            &self.events()?,
            self.meta.quarter_length_sec,
            self.meta.quarters_count,
        )
        .into_iter()
        .filter(|fix| {
            !open_period.is_some_and(|open| fix.event_type == EventType::SubOut && fix.period >= open)
        })
        .collect();
        for fix in &fixes {
            let new = fix.into_new_event(self.meta.id, self.stamp());
            self.insert(new)?;
        }
        info!(game_id = %self.meta.id, inserted = fixes.len(), "Boundary repair finished");
        Ok(fixes.len())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// The full derived view at the current clock reading.
    pub fn view(&self) -> Result<LiveView, SessionError> {
        Ok(build_view(&self.meta, &self.clock, self.selected, self.events()?))
    }

    /// The game record.
    pub const fn meta(&self) -> &GameMeta {
        &self.meta
    }

    /// The clock.
    pub const fn clock(&self) -> &LiveClock {
        &self.clock
    }

    /// The selected player.
    pub const fn selected_player(&self) -> Option<PlayerId> {
        self.selected
    }

    /// The backing store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Close the session and hand back the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// The period still in play, if any.
    const fn open_period(&self) -> Option<u32> {
        if self.meta.final_team_score.is_some() || self.clock.sec_remaining() == 0 {
            None
        } else {
            Some(self.clock.period())
        }
    }

    fn events(&self) -> Result<Vec<Event>, StoreError> {
        self.store.events_for_game(self.meta.id)
    }

    // -----------------------------------------------------------------------
    // Append primitive
    // -----------------------------------------------------------------------

    /// Append one event with a fresh creation stamp and, for score events
    /// and opponent events, the score as it stands once this event counts.
    fn append(
        &mut self,
        player_id: Option<PlayerId>,
        event_type: EventType,
        period: u32,
        clock_sec_remaining: u32,
    ) -> Result<Event, SessionError> {
        let snapshot = if event_type.is_score_event() || event_type.is_opponent_event() {
            Some(scoreboard(&self.events()?).apply(event_type))
        } else {
            None
        };
        let new = NewEvent {
            game_id: self.meta.id,
            player_id,
            event_type,
            period,
            clock_sec_remaining,
            created_at: self.stamp(),
            team_score_at_event: snapshot.map(|b| b.team),
            opponent_score_at_event: snapshot.map(|b| b.opponent),
        };
        self.insert(new)
    }

    fn insert(&mut self, new: NewEvent) -> Result<Event, SessionError> {
        let event = self.store.insert(new)?;
        debug!(
            event_id = %event.id,
            event_type = %event.event_type,
            period = event.period,
            clock = event.clock_sec_remaining,
            "Appended event"
        );
        Ok(event)
    }

    /// Creation stamps strictly increase within a session, even when two
    /// commands land in the same clock tick of the host.
    fn stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_created_at {
            Some(last) if now <= last => last
                .checked_add_signed(TimeDelta::microseconds(1))
                .unwrap_or(now),
            _ => now,
        };
        self.last_created_at = Some(stamp);
        stamp
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use courtside_types::RosterPlayer;

    use super::*;
    use crate::store::{InMemoryStore, new_game_meta};
    use crate::testing::FlakyStore;

    fn roster(n: u32) -> Vec<RosterPlayer> {
        (1..=n)
            .map(|number| RosterPlayer {
                id: PlayerId::new(),
                name: format!("Player {number}"),
                number,
            })
            .collect()
    }

    fn open_with(rules: GameRulesConfig, players: u32) -> (LiveSession<InMemoryStore>, Vec<PlayerId>) {
        open_over(rules, players, |store| store)
    }

    fn open_over<S: EventStore + GameMetaStore>(
        rules: GameRulesConfig,
        players: u32,
        wrap: impl FnOnce(InMemoryStore) -> S,
    ) -> (LiveSession<S>, Vec<PlayerId>) {
        let mut store = InMemoryStore::new();
        let meta = new_game_meta("Rivals", 1, None, roster(players), &rules);
        let ids = meta.roster.iter().map(|p| p.id).collect();
        let game = store.add_game(meta);
        (LiveSession::open(wrap(store), game, &rules).unwrap(), ids)
    }

    fn count_at(view: &LiveView, event_type: EventType, period: u32, clock: u32) -> usize {
        view.events
            .iter()
            .filter(|e| e.event_type == event_type && e.period == period && e.clock_sec_remaining == clock)
            .count()
    }

    fn open_session() -> (LiveSession<InMemoryStore>, Vec<PlayerId>) {
        open_with(GameRulesConfig::default(), 8)
    }

    fn run_clock(session: &mut LiveSession<InMemoryStore>, seconds: u32) {
        if !session.clock().is_running() {
            session.toggle_clock();
        }
        for _ in 0..seconds {
            session.tick().unwrap();
        }
    }

    #[test]
    fn open_unknown_game_fails() {
        let result = LiveSession::open(InMemoryStore::new(), GameId::new(), &GameRulesConfig::default());
        assert!(matches!(result, Err(SessionError::GameNotFound(_))));
    }

    #[test]
    fn stat_without_player_is_dropped() {
        let (mut session, _) = open_session();
        assert!(session.add_event(EventType::TwoMade, None, false).unwrap().is_none());
        assert!(session.view().unwrap().events.is_empty());
    }

    #[test]
    fn stat_uses_selected_player_unless_overridden() {
        let (mut session, p) = open_session();
        assert!(session.select_player(p[0]));
        let a = session.add_event(EventType::Ast, None, false).unwrap().unwrap();
        let b = session.add_event(EventType::Stl, Some(p[1]), false).unwrap().unwrap();
        assert_eq!(a.player_id, Some(p[0]));
        assert_eq!(b.player_id, Some(p[1]));
    }

    #[test]
    fn opponent_events_never_carry_a_player() {
        let (mut session, p) = open_session();
        session.select_player(p[0]);
        let e = session
            .add_event(EventType::OppThreeMade, Some(p[1]), false)
            .unwrap()
            .unwrap();
        assert_eq!(e.player_id, None);
        assert_eq!(e.opponent_score_at_event, Some(3));
        assert_eq!(e.team_score_at_event, Some(0));
    }

    #[test]
    fn snapshots_only_on_score_and_opponent_events() {
        let (mut session, p) = open_session();
        session.select_player(p[0]);
        let made = session.add_event(EventType::ThreeMade, None, false).unwrap().unwrap();
        let miss = session.add_event(EventType::TwoMiss, None, false).unwrap().unwrap();
        let made2 = session.add_event(EventType::FtMade, None, false).unwrap().unwrap();
        assert_eq!(made.team_score_at_event, Some(3));
        assert_eq!(miss.team_score_at_event, None);
        assert_eq!(miss.opponent_score_at_event, None);
        assert_eq!(made2.team_score_at_event, Some(4));
    }

    #[test]
    fn selecting_a_stranger_is_ignored() {
        let (mut session, p) = open_session();
        session.select_player(p[0]);
        assert!(!session.select_player(PlayerId::new()));
        assert_eq!(session.selected_player(), Some(p[0]));
    }

    #[test]
    fn sixth_sub_in_is_dropped() {
        let (mut session, p) = open_session();
        for id in p.iter().take(5) {
            assert!(session.sub_in(*id).unwrap().is_some());
        }
        assert!(session.sub_in(p[5]).unwrap().is_none());
        assert_eq!(session.view().unwrap().on_court.len(), 5);

        assert!(session.sub_out(p[0]).unwrap().is_some());
        assert!(session.sub_in(p[5]).unwrap().is_some());
    }

    #[test]
    fn generic_add_event_obeys_the_court_rules() {
        let (mut session, p) = open_session();
        let added = (0..7)
            .filter(|&i| {
                session
                    .add_event(EventType::SubIn, Some(p[i]), false)
                    .unwrap()
                    .is_some()
            })
            .count();
        assert_eq!(added, 5);
        assert_eq!(session.view().unwrap().on_court.len(), 5);

        assert!(session.add_event(EventType::SubIn, Some(p[0]), false).unwrap().is_none());
        assert!(session.add_event(EventType::SubOut, Some(p[7]), false).unwrap().is_none());
        session.select_player(p[7]);
        assert!(session.add_event(EventType::SubIn, None, false).unwrap().is_none());
        assert_eq!(session.view().unwrap().events.len(), 5);
    }

    #[test]
    fn duplicate_sub_in_and_stray_sub_out_are_dropped() {
        let (mut session, p) = open_session();
        session.sub_in(p[0]).unwrap();
        assert!(session.sub_in(p[0]).unwrap().is_none());
        assert!(session.sub_out(p[1]).unwrap().is_none());
    }

    #[test]
    fn stint_scenario() {
        let (mut session, p) = open_session();
        let a = p[0];
        session.sub_in(a).unwrap();
        run_clock(&mut session, 20);
        let make = session.add_event(EventType::TwoMade, Some(a), false).unwrap().unwrap();
        assert_eq!((make.team_score_at_event, make.opponent_score_at_event), (Some(2), Some(0)));
        run_clock(&mut session, 80);
        session.sub_out(a).unwrap();

        let view = session.view().unwrap();
        assert_eq!(view.plus_minus.get(&a), Some(&2));
        assert_eq!(view.seconds_played.get(&a), Some(&100));
    }

    #[test]
    fn undo_removes_the_last_recorded_event_not_the_latest_in_game_time() {
        let (mut session, p) = open_session();
        session.select_player(p[0]);
        let e1 = session.add_event(EventType::Ast, None, false).unwrap().unwrap();
        run_clock(&mut session, 10);
        let e2 = session.add_event(EventType::Stl, None, false).unwrap().unwrap();
        session.toggle_clock();
        session.reset_quarter();
        // Recorded last, but earlier in game time than e2.
        let e3 = session.add_event(EventType::Blk, None, false).unwrap().unwrap();
        assert!(e3.clock_sec_remaining > e2.clock_sec_remaining);

        let undone = session.undo_last().unwrap().unwrap();
        assert_eq!(undone.id, e3.id);
        let left: Vec<_> = session.view().unwrap().events.iter().map(|e| e.id).collect();
        assert_eq!(left, vec![e1.id, e2.id]);
    }

    #[test]
    fn undo_on_empty_log_is_a_no_op() {
        let (mut session, _) = open_session();
        assert!(session.undo_last().unwrap().is_none());
    }

    #[test]
    fn next_quarter_writes_markers() {
        let (mut session, _) = open_session();
        run_clock(&mut session, 30);
        assert!(session.next_quarter().unwrap());
        let events = session.view().unwrap().events;
        let markers: Vec<(EventType, u32, u32)> = events
            .iter()
            .map(|e| (e.event_type, e.period, e.clock_sec_remaining))
            .collect();
        assert_eq!(
            markers,
            vec![(EventType::PeriodEnd, 1, 570), (EventType::PeriodStart, 2, 600)]
        );
        assert!(events.iter().all(|e| e.player_id.is_none()));
        assert_eq!(events[0].team_score_at_event, Some(0));
        assert!(!session.clock().is_running());
    }

    #[test]
    fn next_quarter_in_final_period_is_a_no_op() {
        let rules = GameRulesConfig {
            quarters_count: 1,
            ..GameRulesConfig::default()
        };
        let (mut session, _) = open_with(rules, 5);
        assert!(!session.next_quarter().unwrap());
        assert!(session.view().unwrap().events.is_empty());
    }

    #[test]
    fn quarter_expiry_subs_out_everyone_on_court() {
        let rules = GameRulesConfig {
            quarter_length_sec: 5,
            ..GameRulesConfig::default()
        };
        let (mut session, p) = open_with(rules, 6);
        session.sub_in(p[0]).unwrap();
        session.sub_in(p[1]).unwrap();
        session.toggle_clock();
        let mut last = TickOutcome::Idle;
        for _ in 0..5 {
            last = session.tick().unwrap();
        }
        assert_eq!(last, TickOutcome::QuarterExpired { period: 1 });

        let view = session.view().unwrap();
        assert!(view.on_court.is_empty());
        let outs = view
            .events
            .iter()
            .filter(|e| e.event_type == EventType::SubOut && e.period == 1 && e.clock_sec_remaining == 0)
            .count();
        assert_eq!(outs, 2);
        assert_eq!(view.seconds_played.get(&p[0]), Some(&5));
    }

    #[test]
    fn reopen_policy_carries_the_lineup() {
        let rules = GameRulesConfig {
            quarter_length_sec: 3,
            carry_over: CarryOverPolicy::Reopen,
            ..GameRulesConfig::default()
        };
        let (mut session, p) = open_with(rules, 6);
        session.sub_in(p[0]).unwrap();
        run_clock(&mut session, 3);
        session.next_quarter().unwrap();

        let view = session.view().unwrap();
        assert_eq!(view.on_court, vec![p[0]]);
        assert_eq!(view.seconds_played.get(&p[0]), Some(&3));
        // Nothing left for the repair pass to do in period 1.
        assert!(
            plan_boundary_repairs(&view.events, 3, 4)
                .iter()
                .all(|f| f.period >= 2)
        );
    }

    #[test]
    fn end_game_persists_the_score() {
        let (mut session, p) = open_session();
        session.add_event(EventType::ThreeMade, Some(p[0]), false).unwrap();
        session.add_event(EventType::OppFtMade, None, false).unwrap();
        session.toggle_clock();

        let board = session.end_game().unwrap();
        assert_eq!((board.team, board.opponent), (3, 1));
        assert!(!session.clock().is_running());
        assert!(session.view().unwrap().game_over);
        let stored = session.store().game(session.meta().id).unwrap().unwrap();
        assert_eq!(stored.final_team_score, Some(3));
        assert_eq!(stored.final_opponent_score, Some(1));
    }

    #[test]
    fn repair_is_idempotent() {
        let (mut session, p) = open_session();
        session.sub_in(p[0]).unwrap();
        session.sub_in(p[1]).unwrap();
        // Advance by hand without the buzzer closing anyone out.
        session.next_quarter().unwrap();
        session.add_event(EventType::TwoMade, Some(p[0]), false).unwrap();

        // Period 1 is closed and the lineup reopened for period 2, which is
        // still open.
        let first = session.repair_boundaries().unwrap();
        assert_eq!(first, 4);
        assert_eq!(session.repair_boundaries().unwrap(), 0);
    }

    #[test]
    fn repair_mid_period_credits_only_played_time() {
        let (mut session, p) = open_session();
        session.sub_in(p[0]).unwrap();
        run_clock(&mut session, 40);
        session.toggle_clock();

        assert_eq!(session.repair_boundaries().unwrap(), 0);
        let view = session.view().unwrap();
        assert_eq!(view.on_court, vec![p[0]]);
        assert_eq!(view.seconds_played.get(&p[0]), Some(&40));

        session.end_game().unwrap();
        assert_eq!(session.repair_boundaries().unwrap(), 1);
        assert!(session.view().unwrap().on_court.is_empty());
    }

    #[test]
    fn failed_buzzer_close_out_is_retried() {
        let rules = GameRulesConfig {
            quarter_length_sec: 3,
            ..GameRulesConfig::default()
        };
        let (mut session, p) = open_over(rules, 6, FlakyStore::new);
        let budget = session.store().budget();
        session.sub_in(p[0]).unwrap();
        session.sub_in(p[1]).unwrap();
        session.toggle_clock();
        session.tick().unwrap();
        session.tick().unwrap();

        // One of the two sub-outs lands before the store goes down.
        budget.allow(1);
        assert!(session.tick().is_err());
        assert!(session.close_out_pending());
        assert_eq!(session.clock().sec_remaining(), 0);
        assert!(!session.clock().is_running());

        budget.allow(0);
        assert!(session.tick().is_err());
        assert!(session.close_out_pending());

        budget.heal();
        assert_eq!(session.tick().unwrap(), TickOutcome::QuarterExpired { period: 1 });
        assert!(!session.close_out_pending());
        assert_eq!(session.tick().unwrap(), TickOutcome::Idle);

        let view = session.view().unwrap();
        assert!(view.on_court.is_empty());
        assert_eq!(count_at(&view, EventType::SubOut, 1, 0), 2);
        assert_eq!(view.seconds_played.get(&p[0]), Some(&3));
        assert_eq!(view.seconds_played.get(&p[1]), Some(&3));
    }

    #[test]
    fn retried_reopen_writes_each_sub_in_once() {
        let rules = GameRulesConfig {
            quarter_length_sec: 2,
            carry_over: CarryOverPolicy::Reopen,
            ..GameRulesConfig::default()
        };
        let (mut session, p) = open_over(rules, 6, FlakyStore::new);
        let budget = session.store().budget();
        session.sub_in(p[0]).unwrap();
        session.sub_in(p[1]).unwrap();
        session.toggle_clock();
        session.tick().unwrap();

        // Both sub-outs and the first sub-in land.
        budget.allow(3);
        assert!(session.tick().is_err());
        budget.heal();
        assert_eq!(session.tick().unwrap(), TickOutcome::QuarterExpired { period: 1 });

        let view = session.view().unwrap();
        assert_eq!(view.on_court.len(), 2);
        assert_eq!(count_at(&view, EventType::SubOut, 1, 0), 2);
        assert_eq!(count_at(&view, EventType::SubIn, 2, 2), 2);
    }

    #[test]
    fn reopened_session_resumes_the_clock() {
        let (mut session, p) = open_session();
        session.select_player(p[0]);
        run_clock(&mut session, 45);
        session.add_event(EventType::Ast, None, false).unwrap();
        session.toggle_clock();
        let game = session.meta().id;

        let store = session.into_store();
        let resumed = LiveSession::open(store, game, &GameRulesConfig::default()).unwrap();
        assert_eq!(resumed.clock().period(), 1);
        assert_eq!(resumed.clock().sec_remaining(), 555);
        assert!(!resumed.clock().is_running());
    }

    #[test]
    fn creation_stamps_strictly_increase() {
        let (mut session, p) = open_session();
        session.select_player(p[0]);
        let stamps: Vec<DateTime<Utc>> = (0..20)
            .map(|_| session.add_event(EventType::RebDef, None, false).unwrap().unwrap().created_at)
            .collect();
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }
}
