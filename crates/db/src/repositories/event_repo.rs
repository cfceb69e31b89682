//! Repository for events, reward tiers, progress and tier claims.

use idolsim_core::event::RewardTier;
use idolsim_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::event::{Event, EventProgress, TierRow};

const COLUMNS: &str = "id, name, starts_at, ends_at, created_at";

const PROGRESS_COLUMNS: &str = "event_id, user_id, points, updated_at";

pub struct EventRepo;

impl EventRepo {
    /// List all events, most recent start first.
    pub async fn list<'e>(db: impl PgExecutor<'e>) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events ORDER BY starts_at DESC, id DESC");
        sqlx::query_as::<_, Event>(&query).fetch_all(db).await
    }

    pub async fn find_by_id<'e>(
        db: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Reward tiers sorted by threshold ascending.
    pub async fn tiers<'e>(
        db: impl PgExecutor<'e>,
        event_id: DbId,
    ) -> Result<Vec<RewardTier>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TierRow>(
            "SELECT threshold, reward FROM event_reward_tiers
             WHERE event_id = $1 ORDER BY threshold",
        )
        .bind(event_id)
        .fetch_all(db)
        .await?;
        Ok(rows.into_iter().map(RewardTier::from).collect())
    }

    pub async fn progress<'e>(
        db: impl PgExecutor<'e>,
        event_id: DbId,
        user_id: DbId,
    ) -> Result<Option<EventProgress>, sqlx::Error> {
        let query = format!(
            "SELECT {PROGRESS_COLUMNS} FROM event_progress WHERE event_id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, EventProgress>(&query)
            .bind(event_id)
            .bind(user_id)
            .fetch_optional(db)
            .await
    }

    /// Store a new point total. `updated_at` only moves when the total changes,
    /// so it records when the current total was first reached.
    pub async fn set_points(
        conn: &mut PgConnection,
        event_id: DbId,
        user_id: DbId,
        points: i64,
    ) -> Result<EventProgress, sqlx::Error> {
        let query = format!(
            "INSERT INTO event_progress (event_id, user_id, points) VALUES ($1, $2, $3)
             ON CONFLICT (event_id, user_id) DO UPDATE SET
                points = EXCLUDED.points,
                updated_at = CASE
                    WHEN event_progress.points <> EXCLUDED.points THEN NOW()
                    ELSE event_progress.updated_at
                END
             RETURNING {PROGRESS_COLUMNS}"
        );
        sqlx::query_as::<_, EventProgress>(&query)
            .bind(event_id)
            .bind(user_id)
            .bind(points)
            .fetch_one(conn)
            .await
    }

    pub async fn claimed_thresholds<'e>(
        db: impl PgExecutor<'e>,
        event_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT threshold FROM event_tier_claims
             WHERE event_id = $1 AND user_id = $2 ORDER BY threshold",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    /// Record a tier claim. Returns `false` if it was already claimed.
    pub async fn record_claim(
        conn: &mut PgConnection,
        event_id: DbId,
        user_id: DbId,
        threshold: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO event_tier_claims (event_id, user_id, threshold) VALUES ($1, $2, $3)
             ON CONFLICT DO NOTHING",
        )
        .bind(event_id)
        .bind(user_id)
        .bind(threshold)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Top participants in ranking order: points descending, then earliest
    /// arrival at the current total, then user id.
    pub async fn leaderboard<'e>(
        db: impl PgExecutor<'e>,
        event_id: DbId,
        limit: i64,
    ) -> Result<Vec<EventProgress>, sqlx::Error> {
        let query = format!(
            "SELECT {PROGRESS_COLUMNS} FROM event_progress
             WHERE event_id = $1
             ORDER BY points DESC, updated_at ASC, user_id ASC
             LIMIT $2"
        );
        sqlx::query_as::<_, EventProgress>(&query)
            .bind(event_id)
            .bind(limit)
            .fetch_all(db)
            .await
    }
}
