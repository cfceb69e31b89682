//! Repository for promo codes and their redemptions.

use idolsim_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::promo::PromoCode;

pub struct PromoRepo;

impl PromoRepo {
    /// Look up a code by its normalized form.
    pub async fn find<'e>(
        db: impl PgExecutor<'e>,
        code: &str,
    ) -> Result<Option<PromoCode>, sqlx::Error> {
        sqlx::query_as::<_, PromoCode>(
            "SELECT code, reward, starts_at, ends_at FROM promo_codes WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(db)
        .await
    }

    pub async fn is_redeemed<'e>(
        db: impl PgExecutor<'e>,
        code: &str,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM promo_redemptions WHERE code = $1 AND user_id = $2)",
        )
        .bind(code)
        .bind(user_id)
        .fetch_one(db)
        .await
    }

    /// Record a redemption. Returns `false` if the user already redeemed it.
    pub async fn record_redemption(
        conn: &mut PgConnection,
        code: &str,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO promo_redemptions (code, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(code)
        .bind(user_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
