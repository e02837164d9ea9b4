//! Store doubles shared by the unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use courtside_types::{Event, EventId, GameId, GameMeta, NewEvent};

use crate::store::{EventStore, GameMetaStore, InMemoryStore, StoreError};

const UNLIMITED: usize = usize::MAX;

/// An [`InMemoryStore`] whose inserts can be made to fail.
#[derive(Debug, Clone)]
pub struct FlakyStore {
    inner: InMemoryStore,
    budget: Arc<AtomicUsize>,
}

/// Controls how many more inserts a [`FlakyStore`] accepts.
#[derive(Debug, Clone)]
pub struct InsertBudget(Arc<AtomicUsize>);

impl InsertBudget {
    /// Accept `n` more inserts, then fail every one after.
    pub fn allow(&self, n: usize) {
        self.0.store(n, Ordering::SeqCst);
    }

    /// Accept every insert again.
    pub fn heal(&self) {
        self.0.store(UNLIMITED, Ordering::SeqCst);
    }
}

impl FlakyStore {
    pub fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            budget: Arc::new(AtomicUsize::new(UNLIMITED)),
        }
    }

    pub fn budget(&self) -> InsertBudget {
        InsertBudget(Arc::clone(&self.budget))
    }
}

impl EventStore for FlakyStore {
    fn insert(&mut self, event: NewEvent) -> Result<Event, StoreError> {
        let granted = self
            .budget
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| {
                if left == UNLIMITED {
                    Some(left)
                } else {
                    left.checked_sub(1)
                }
            })
            .is_ok();
        if !granted {
            return Err(StoreError::Backend("down".to_owned()));
        }
        self.inner.insert(event)
    }

    fn delete_by_id(&mut self, id: EventId) -> Result<bool, StoreError> {
        self.inner.delete_by_id(id)
    }

    fn delete_most_recently_created(
        &mut self,
        game_id: GameId,
    ) -> Result<Option<Event>, StoreError> {
        self.inner.delete_most_recently_created(game_id)
    }

    fn events_for_game(&self, game_id: GameId) -> Result<Vec<Event>, StoreError> {
        self.inner.events_for_game(game_id)
    }
}

impl GameMetaStore for FlakyStore {
    fn game(&self, id: GameId) -> Result<Option<GameMeta>, StoreError> {
        self.inner.game(id)
    }

    fn persist_final_score(
        &mut self,
        id: GameId,
        team_score: u32,
        opponent_score: u32,
    ) -> Result<(), StoreError> {
        self.inner.persist_final_score(id, team_score, opponent_score)
    }
}
