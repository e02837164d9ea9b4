//! Collaborator interfaces for the event log and game metadata.
//!
//! The session never talks to a database directly. It appends, deletes, and
//! lists events through [`EventStore`] and reads/updates the game record
//! through [`GameMetaStore`]. Both traits are synchronous; an async backend
//! bridges into them from inside the runtime.
//!
//! [`InMemoryStore`] implements both and backs the tests.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use courtside_types::{Event, EventId, GameId, GameMeta, NewEvent, RosterPlayer};

use crate::config::GameRulesConfig;

/// Errors surfaced by a store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The game does not exist in the backing store.
    #[error("game not found: {0}")]
    GameNotFound(GameId),

    /// The backend failed (connection, query, decoding).
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Append-only per-game event log.
pub trait EventStore {
    /// Persist a new event and return it with its assigned id.
    fn insert(&mut self, event: NewEvent) -> Result<Event, StoreError>;

    /// Delete one event. Returns whether anything was deleted.
    fn delete_by_id(&mut self, id: EventId) -> Result<bool, StoreError>;

    /// Delete and return the event with the latest `created_at` for the
    /// game, if any. Ties on `created_at` go to the larger id.
    fn delete_most_recently_created(&mut self, game_id: GameId)
    -> Result<Option<Event>, StoreError>;

    /// Every event for the game, in no particular order.
    fn events_for_game(&self, game_id: GameId) -> Result<Vec<Event>, StoreError>;
}

/// Game metadata records.
pub trait GameMetaStore {
    /// Look up a game.
    fn game(&self, id: GameId) -> Result<Option<GameMeta>, StoreError>;

    /// Record the final score on the game.
    fn persist_final_score(
        &mut self,
        id: GameId,
        team_score: u32,
        opponent_score: u32,
    ) -> Result<(), StoreError>;
}

/// Build a fresh game record using the configured rules.
pub fn new_game_meta(
    opponent_name: impl Into<String>,
    round_number: u32,
    game_date: Option<NaiveDate>,
    roster: Vec<RosterPlayer>,
    rules: &GameRulesConfig,
) -> GameMeta {
    GameMeta {
        id: GameId::new(),
        opponent_name: opponent_name.into(),
        round_number,
        game_date,
        quarter_length_sec: rules.quarter_length_sec,
        quarters_count: rules.quarters_count,
        roster,
        final_team_score: None,
        final_opponent_score: None,
        created_at: Utc::now(),
    }
}

/// In-process store for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    games: BTreeMap<GameId, GameMeta>,
    events: BTreeMap<GameId, Vec<Event>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a game record, replacing any record with the same id.
    pub fn add_game(&mut self, meta: GameMeta) -> GameId {
        let id = meta.id;
        self.games.insert(id, meta);
        id
    }

    /// Number of events stored for a game.
    pub fn event_count(&self, game_id: GameId) -> usize {
        self.events.get(&game_id).map_or(0, Vec::len)
    }
}

impl EventStore for InMemoryStore {
    fn insert(&mut self, event: NewEvent) -> Result<Event, StoreError> {
        if !self.games.contains_key(&event.game_id) {
            return Err(StoreError::GameNotFound(event.game_id));
        }
        let stored = event.into_event(EventId::new());
        self.events
            .entry(stored.game_id)
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    fn delete_by_id(&mut self, id: EventId) -> Result<bool, StoreError> {
        for log in self.events.values_mut() {
            if let Some(pos) = log.iter().position(|e| e.id == id) {
                log.remove(pos);
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn delete_most_recently_created(
        &mut self,
        game_id: GameId,
    ) -> Result<Option<Event>, StoreError> {
        let Some(log) = self.events.get_mut(&game_id) else {
            return Ok(None);
        };
        let latest = log
            .iter()
            .enumerate()
            .max_by_key(|(_, e)| (e.created_at, e.id))
            .map(|(pos, _)| pos);
        Ok(latest.map(|pos| log.remove(pos)))
    }

    fn events_for_game(&self, game_id: GameId) -> Result<Vec<Event>, StoreError> {
        Ok(self.events.get(&game_id).cloned().unwrap_or_default())
    }
}

impl GameMetaStore for InMemoryStore {
    fn game(&self, id: GameId) -> Result<Option<GameMeta>, StoreError> {
        Ok(self.games.get(&id).cloned())
    }

    fn persist_final_score(
        &mut self,
        id: GameId,
        team_score: u32,
        opponent_score: u32,
    ) -> Result<(), StoreError> {
        let meta = self.games.get_mut(&id).ok_or(StoreError::GameNotFound(id))?;
        meta.final_team_score = Some(team_score);
        meta.final_opponent_score = Some(opponent_score);
        Ok(())
    }
}
