//! Repository for the `user_items` table.

use std::collections::BTreeMap;

use idolsim_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::user::UserItem;

pub struct InventoryRepo;

impl InventoryRepo {
    /// All item counts held by a user, keyed by item name.
    pub async fn list<'e>(
        db: impl PgExecutor<'e>,
        user_id: DbId,
    ) -> Result<BTreeMap<String, i64>, sqlx::Error> {
        let rows = sqlx::query_as::<_, UserItem>(
            "SELECT item_name, count FROM user_items
             WHERE user_id = $1 AND count > 0 ORDER BY item_name",
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows.into_iter().map(|r| (r.item_name, r.count)).collect())
    }

    /// Set the absolute count of one item.
    pub async fn set_count(
        conn: &mut PgConnection,
        user_id: DbId,
        item_name: &str,
        count: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_items (user_id, item_name, count) VALUES ($1, $2, $3)
             ON CONFLICT (user_id, item_name) DO UPDATE SET count = EXCLUDED.count",
        )
        .bind(user_id)
        .bind(item_name)
        .bind(count)
        .execute(conn)
        .await?;
        Ok(())
    }
}
