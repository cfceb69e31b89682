//! Repository for the append-only `gacha_history` table.

use idolsim_core::gacha::Draw;
use idolsim_core::types::DbId;
use sqlx::PgConnection;

use crate::models::gacha::GachaPull;

const COLUMNS: &str = "id, user_id, template_id, rarity, guaranteed, pulled_at";

pub struct GachaRepo;

impl GachaRepo {
    pub async fn record(
        conn: &mut PgConnection,
        user_id: DbId,
        draw: &Draw,
    ) -> Result<GachaPull, sqlx::Error> {
        let query = format!(
            "INSERT INTO gacha_history (user_id, template_id, rarity, guaranteed)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GachaPull>(&query)
            .bind(user_id)
            .bind(draw.template_id)
            .bind(draw.rarity.as_str())
            .bind(draw.guaranteed)
            .fetch_one(conn)
            .await
    }
}
