//! Repository for the `idols` table.

use idolsim_core::idol::MAX_AFFECTION;
use idolsim_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::idol::{Idol, OwnedIdol};

const COLUMNS: &str =
    "id, user_id, template_id, level, affection, is_locked, star_rank, awakened, created_at";

pub struct IdolRepo;

impl IdolRepo {
    /// Grant a new idol instance at level 1 with no affection.
    pub async fn create(
        conn: &mut PgConnection,
        user_id: DbId,
        template_id: DbId,
    ) -> Result<Idol, sqlx::Error> {
        let query = format!(
            "INSERT INTO idols (user_id, template_id) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Idol>(&query)
            .bind(user_id)
            .bind(template_id)
            .fetch_one(conn)
            .await
    }

    /// List a user's idols with template data, newest first.
    pub async fn list_for_user<'e>(
        db: impl PgExecutor<'e>,
        user_id: DbId,
    ) -> Result<Vec<OwnedIdol>, sqlx::Error> {
        sqlx::query_as::<_, OwnedIdol>(
            "SELECT i.id, i.template_id, t.name, t.rarity, t.idol_type,
                    t.vocal, t.dance, t.visual,
                    i.level, i.affection, i.is_locked, i.star_rank, i.awakened, i.created_at
             FROM idols i
             JOIN idol_templates t ON t.id = i.template_id
             WHERE i.user_id = $1
             ORDER BY i.created_at DESC, i.id DESC",
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    /// Find an idol only if it belongs to `user_id`.
    pub async fn find_owned<'e>(
        db: impl PgExecutor<'e>,
        user_id: DbId,
        idol_id: DbId,
    ) -> Result<Option<Idol>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM idols WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Idol>(&query)
            .bind(idol_id)
            .bind(user_id)
            .fetch_optional(db)
            .await
    }

    /// The subset of `ids` owned by `user_id`.
    pub async fn owned_ids<'e>(
        db: impl PgExecutor<'e>,
        user_id: DbId,
        ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM idols WHERE user_id = $1 AND id = ANY($2) ORDER BY id",
        )
        .bind(user_id)
        .bind(ids)
        .fetch_all(db)
        .await
    }

    /// Returns `None` if the idol does not exist or belongs to someone else.
    pub async fn set_locked(
        conn: &mut PgConnection,
        user_id: DbId,
        idol_id: DbId,
        locked: bool,
    ) -> Result<Option<Idol>, sqlx::Error> {
        let query = format!(
            "UPDATE idols SET is_locked = $3 WHERE id = $1 AND user_id = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Idol>(&query)
            .bind(idol_id)
            .bind(user_id)
            .bind(locked)
            .fetch_optional(conn)
            .await
    }

    /// Add affection, clamped at the maximum. Returns `false` if no owned idol matched.
    pub async fn add_affection(
        conn: &mut PgConnection,
        user_id: DbId,
        idol_id: DbId,
        amount: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE idols SET affection = LEAST(affection + $3, $4)
             WHERE id = $1 AND user_id = $2",
        )
        .bind(idol_id)
        .bind(user_id)
        .bind(amount)
        .bind(MAX_AFFECTION)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an unlocked idol. Returns `true` if a row was removed.
    pub async fn delete_unlocked(
        conn: &mut PgConnection,
        user_id: DbId,
        idol_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM idols WHERE id = $1 AND user_id = $2 AND NOT is_locked")
                .bind(idol_id)
                .bind(user_id)
                .execute(conn)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
