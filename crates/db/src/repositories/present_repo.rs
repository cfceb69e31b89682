//! Repository for the `presents` table.

use idolsim_core::present::NewPresent;
use idolsim_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::present::Present;

const COLUMNS: &str = "id, user_id, kind, item_name, amount, description, received_at";

pub struct PresentRepo;

impl PresentRepo {
    pub async fn create(
        conn: &mut PgConnection,
        user_id: DbId,
        input: &NewPresent,
    ) -> Result<Present, sqlx::Error> {
        let query = format!(
            "INSERT INTO presents (user_id, kind, item_name, amount, description)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Present>(&query)
            .bind(user_id)
            .bind(input.kind.as_str())
            .bind(&input.item_name)
            .bind(input.amount)
            .bind(&input.description)
            .fetch_one(conn)
            .await
    }

    /// Pending presents, oldest first.
    pub async fn list_for_user<'e>(
        db: impl PgExecutor<'e>,
        user_id: DbId,
    ) -> Result<Vec<Present>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM presents WHERE user_id = $1 ORDER BY received_at, id"
        );
        sqlx::query_as::<_, Present>(&query)
            .bind(user_id)
            .fetch_all(db)
            .await
    }

    /// Delete and return one present owned by `user_id`.
    pub async fn take(
        conn: &mut PgConnection,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<Present>, sqlx::Error> {
        let query =
            format!("DELETE FROM presents WHERE id = $1 AND user_id = $2 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Present>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(conn)
            .await
    }

    /// Delete and return every pending present of a user.
    pub async fn take_all(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<Vec<Present>, sqlx::Error> {
        let query = format!("DELETE FROM presents WHERE user_id = $1 RETURNING {COLUMNS}");
        let mut presents = sqlx::query_as::<_, Present>(&query)
            .bind(user_id)
            .fetch_all(conn)
            .await?;
        presents.sort_by_key(|p| (p.received_at, p.id));
        Ok(presents)
    }
}
