//! The per-game event log in `game_events`.
//!
//! Rows are never updated. They are appended by the live session, removed
//! one at a time by undo or repair, and read back whole for replay. Reads
//! are returned in canonical game order for convenience, but callers must
//! not depend on it; the replay layer re-sorts.

use courtside_types::{Event, EventId, EventType, GameId, NewEvent, PlayerId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::columns::{from_column, from_column_opt, to_column, to_column_opt};
use crate::error::DbError;

const EVENT_COLUMNS: &str = "id, game_id, player_id, event_type, period, clock_sec_remaining, \
     created_at, team_score_at_event, opponent_score_at_event";

/// Operations on the `game_events` table.
pub struct PgEventStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgEventStore<'a> {
    /// Bind to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append one event. The id is assigned here (UUID v7).
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails, including when
    /// the game does not exist (foreign key).
    pub async fn insert(&self, event: NewEvent) -> Result<Event, DbError> {
        let stored = event.into_event(EventId::new());
        sqlx::query(
            r"INSERT INTO game_events (id, game_id, player_id, event_type, period, clock_sec_remaining,
                                       created_at, team_score_at_event, opponent_score_at_event)
              VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(stored.id.into_inner())
        .bind(stored.game_id.into_inner())
        .bind(stored.player_id.map(PlayerId::into_inner))
        .bind(stored.event_type.as_db_str())
        .bind(to_column(stored.period, "period")?)
        .bind(to_column(stored.clock_sec_remaining, "clock_sec_remaining")?)
        .bind(stored.created_at)
        .bind(to_column_opt(stored.team_score_at_event, "team_score_at_event")?)
        .bind(to_column_opt(
            stored.opponent_score_at_event,
            "opponent_score_at_event",
        )?)
        .execute(self.pool)
        .await?;

        tracing::debug!(
            game_id = %stored.game_id,
            event_id = %stored.id,
            event_type = stored.event_type.as_db_str(),
            period = stored.period,
            clock = stored.clock_sec_remaining,
            "Inserted event"
        );
        Ok(stored)
    }

    /// Delete one event. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the delete fails.
    pub async fn delete_by_id(&self, id: EventId) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM game_events WHERE id = $1")
            .bind(id.into_inner())
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete and return the newest-created event of a game. Ties on
    /// `created_at` go to the larger id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the delete fails and
    /// [`DbError::Decode`] if the removed row cannot be decoded.
    pub async fn delete_most_recently_created(
        &self,
        game_id: GameId,
    ) -> Result<Option<Event>, DbError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r"DELETE FROM game_events
              WHERE id = (
                  SELECT id FROM game_events
                  WHERE game_id = $1
                  ORDER BY created_at DESC, id DESC
                  LIMIT 1
              )
              RETURNING {EVENT_COLUMNS}"
        ))
        .bind(game_id.into_inner())
        .fetch_optional(self.pool)
        .await?;

        row.map(Event::try_from).transpose()
    }

    /// Every event of a game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails and
    /// [`DbError::Decode`] if any row cannot be decoded.
    pub async fn events_for_game(&self, game_id: GameId) -> Result<Vec<Event>, DbError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            r"SELECT {EVENT_COLUMNS}
              FROM game_events
              WHERE game_id = $1
              ORDER BY period, clock_sec_remaining DESC, created_at, id"
        ))
        .bind(game_id.into_inner())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Event::try_from).collect()
    }
}

/// A row from `game_events`.
///
/// Columns use the database's own types; [`Event::try_from`] maps them onto
/// the domain.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
    /// Event id.
    pub id: Uuid,
    /// Owning game.
    pub game_id: Uuid,
    /// Credited player, if any.
    pub player_id: Option<Uuid>,
    /// `SCREAMING_SNAKE_CASE` storage name of the event type.
    pub event_type: String,
    /// Period, from 1.
    pub period: i32,
    /// Seconds left on the clock.
    pub clock_sec_remaining: i32,
    /// Creation timestamp.
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Our score snapshot.
    pub team_score_at_event: Option<i32>,
    /// Opponent score snapshot.
    pub opponent_score_at_event: Option<i32>,
}

impl TryFrom<EventRow> for Event {
    type Error = DbError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let event_type = EventType::from_db_str(&row.event_type)
            .ok_or_else(|| DbError::Decode(format!("unknown event type {:?}", row.event_type)))?;
        Ok(Self {
            id: EventId::from(row.id),
            game_id: GameId::from(row.game_id),
            player_id: row.player_id.map(PlayerId::from),
            event_type,
            period: from_column(row.period, "period")?,
            clock_sec_remaining: from_column(row.clock_sec_remaining, "clock_sec_remaining")?,
            created_at: row.created_at,
            team_score_at_event: from_column_opt(row.team_score_at_event, "team_score_at_event")?,
            opponent_score_at_event: from_column_opt(
                row.opponent_score_at_event,
                "opponent_score_at_event",
            )?,
        })
    }
}
