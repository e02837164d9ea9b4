//! PostgreSQL-backed store for [`LiveSession`](courtside_core::session::LiveSession).
//!
//! # Sync/Async Bridge
//!
//! The [`EventStore`] and [`GameMetaStore`] traits are synchronous, but the
//! `sqlx` stores are async. Each call runs the async operation to completion
//! with [`Handle::block_on`] wrapped in [`tokio::task::block_in_place`], so
//! the runtime keeps scheduling other tasks meanwhile. This only works on
//! the multi-threaded runtime.

use std::future::Future;

use courtside_core::store::{EventStore, GameMetaStore, StoreError};
use courtside_db::{DbError, PgEventStore, PgGameStore};
use courtside_types::{Event, EventId, GameId, GameMeta, NewEvent};
use sqlx::PgPool;
use tokio::runtime::{Handle, RuntimeFlavor};

use crate::error::EngineError;

/// Blocking adapter from the async `PostgreSQL` stores to the session's
/// store traits.
#[derive(Debug, Clone)]
pub struct PgSessionStore {
    pool: PgPool,
    handle: Handle,
}

impl PgSessionStore {
    /// Capture the current runtime.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Runtime`] outside a runtime or on a
    /// current-thread runtime, where blocking in place would panic.
    pub fn new(pool: PgPool) -> Result<Self, EngineError> {
        let handle = Handle::try_current().map_err(|e| EngineError::Runtime {
            message: format!("no tokio runtime available: {e}"),
        })?;
        if handle.runtime_flavor() != RuntimeFlavor::MultiThread {
            return Err(EngineError::Runtime {
                message: "the PostgreSQL session store needs the multi-threaded runtime".to_owned(),
            });
        }
        Ok(Self { pool, handle })
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        tokio::task::block_in_place(|| self.handle.block_on(future))
    }
}

impl EventStore for PgSessionStore {
    fn insert(&mut self, event: NewEvent) -> Result<Event, StoreError> {
        self.block_on(PgEventStore::new(&self.pool).insert(event))
            .map_err(store_error)
    }

    fn delete_by_id(&mut self, id: EventId) -> Result<bool, StoreError> {
        self.block_on(PgEventStore::new(&self.pool).delete_by_id(id))
            .map_err(store_error)
    }

    fn delete_most_recently_created(
        &mut self,
        game_id: GameId,
    ) -> Result<Option<Event>, StoreError> {
        self.block_on(PgEventStore::new(&self.pool).delete_most_recently_created(game_id))
            .map_err(store_error)
    }

    fn events_for_game(&self, game_id: GameId) -> Result<Vec<Event>, StoreError> {
        self.block_on(PgEventStore::new(&self.pool).events_for_game(game_id))
            .map_err(store_error)
    }
}

impl GameMetaStore for PgSessionStore {
    fn game(&self, id: GameId) -> Result<Option<GameMeta>, StoreError> {
        self.block_on(PgGameStore::new(&self.pool).game(id))
            .map_err(store_error)
    }

    fn persist_final_score(
        &mut self,
        id: GameId,
        team_score: u32,
        opponent_score: u32,
    ) -> Result<(), StoreError> {
        self.block_on(PgGameStore::new(&self.pool).persist_final_score(
            id,
            team_score,
            opponent_score,
        ))
        .map_err(store_error)
    }
}

fn store_error(error: DbError) -> StoreError {
    match error {
        DbError::GameNotFound(id) => StoreError::GameNotFound(id),
        other => StoreError::Backend(other.to_string()),
    }
}
