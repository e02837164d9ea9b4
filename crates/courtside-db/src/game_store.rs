//! Game records and rosters.
//!
//! A game row carries the period rules it was created with, so replaying an
//! old game never depends on the current configuration.

use courtside_types::{GameId, GameMeta, PlayerId, RosterPlayer};
use sqlx::PgPool;
use uuid::Uuid;

use crate::columns::{from_column, from_column_opt, to_column};
use crate::error::DbError;

/// Operations on `games`, `players`, and `game_roster`.
pub struct PgGameStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgGameStore<'a> {
    /// Bind to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a new game with its roster in one transaction. Players already
    /// known by id get their name and number refreshed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if any statement fails; nothing is
    /// written in that case.
    pub async fn create_game(&self, meta: &GameMeta) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"INSERT INTO games (id, opponent_name, round_number, game_date,
                                 quarter_length_sec, quarters_count, created_at)
              VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(meta.id.into_inner())
        .bind(&meta.opponent_name)
        .bind(to_column(meta.round_number, "round_number")?)
        .bind(meta.game_date)
        .bind(to_column(meta.quarter_length_sec, "quarter_length_sec")?)
        .bind(to_column(meta.quarters_count, "quarters_count")?)
        .bind(meta.created_at)
        .execute(&mut *tx)
        .await?;

        for (order, player) in (0_i32..).zip(&meta.roster) {
            sqlx::query(
                r"INSERT INTO players (id, name, number)
                  VALUES ($1, $2, $3)
                  ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, number = EXCLUDED.number",
            )
            .bind(player.id.into_inner())
            .bind(&player.name)
            .bind(to_column(player.number, "number")?)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                "INSERT INTO game_roster (game_id, player_id, display_order) VALUES ($1, $2, $3)",
            )
            .bind(meta.id.into_inner())
            .bind(player.id.into_inner())
            .bind(order)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::info!(
            game_id = %meta.id,
            opponent = %meta.opponent_name,
            roster = meta.roster.len(),
            "Created game"
        );
        Ok(())
    }

    /// Look up a game with its roster in display order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if a query fails and
    /// [`DbError::Decode`] if a stored counter is negative.
    pub async fn game(&self, id: GameId) -> Result<Option<GameMeta>, DbError> {
        let Some(row) = sqlx::query_as::<_, GameRow>(
            r"SELECT id, opponent_name, round_number, game_date, quarter_length_sec,
                     quarters_count, final_team_score, final_opponent_score, created_at
              FROM games
              WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool)
        .await?
        else {
            return Ok(None);
        };

        let roster = sqlx::query_as::<_, RosterRow>(
            r"SELECT p.id, p.name, p.number
              FROM game_roster r
              JOIN players p ON p.id = r.player_id
              WHERE r.game_id = $1
              ORDER BY r.display_order",
        )
        .bind(id.into_inner())
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(RosterPlayer::try_from)
        .collect::<Result<Vec<_>, _>>()?;

        row.into_meta(roster).map(Some)
    }

    /// Record the final score.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::GameNotFound`] if no row was updated.
    pub async fn persist_final_score(
        &self,
        id: GameId,
        team_score: u32,
        opponent_score: u32,
    ) -> Result<(), DbError> {
        let result = sqlx::query(
            "UPDATE games SET final_team_score = $2, final_opponent_score = $3 WHERE id = $1",
        )
        .bind(id.into_inner())
        .bind(to_column(team_score, "final_team_score")?)
        .bind(to_column(opponent_score, "final_opponent_score")?)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::GameNotFound(id));
        }
        tracing::info!(game_id = %id, team_score, opponent_score, "Persisted final score");
        Ok(())
    }
}

/// A row from `games`, without the roster.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GameRow {
    /// Game id.
    pub id: Uuid,
    /// Opponent team name.
    pub opponent_name: String,
    /// League round.
    pub round_number: i32,
    /// Calendar date, if recorded.
    pub game_date: Option<chrono::NaiveDate>,
    /// Period length in seconds.
    pub quarter_length_sec: i32,
    /// Regulation periods.
    pub quarters_count: i32,
    /// Final team score once the game is closed.
    pub final_team_score: Option<i32>,
    /// Final opponent score once the game is closed.
    pub final_opponent_score: Option<i32>,
    /// Row creation time.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl GameRow {
    /// Attach a roster and convert to the domain record.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Decode`] if a stored counter is negative.
    pub fn into_meta(self, roster: Vec<RosterPlayer>) -> Result<GameMeta, DbError> {
        Ok(GameMeta {
            id: GameId::from(self.id),
            opponent_name: self.opponent_name,
            round_number: from_column(self.round_number, "round_number")?,
            game_date: self.game_date,
            quarter_length_sec: from_column(self.quarter_length_sec, "quarter_length_sec")?,
            quarters_count: from_column(self.quarters_count, "quarters_count")?,
            roster,
            final_team_score: from_column_opt(self.final_team_score, "final_team_score")?,
            final_opponent_score: from_column_opt(
                self.final_opponent_score,
                "final_opponent_score",
            )?,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RosterRow {
    id: Uuid,
    name: String,
    number: i32,
}

impl TryFrom<RosterRow> for RosterPlayer {
    type Error = DbError;

    fn try_from(row: RosterRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PlayerId::from(row.id),
            name: row.name,
            number: from_column(row.number, "number")?,
        })
    }
}
