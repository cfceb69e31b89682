//! Repository for the `users` table.

use chrono::NaiveDate;
use idolsim_core::ledger::Balances;
use idolsim_core::stamina::StaminaState;
use idolsim_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, money, star_jewels, level, exp, max_exp, stamina, max_stamina, \
     last_stamina_update, login_streak, last_login_date, created_at, updated_at";

/// A user that PVP matchmaking may pick as an opponent.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PvpCandidate {
    pub id: DbId,
    pub name: String,
}

pub struct UserRepo;

impl UserRepo {
    /// Insert a new user with default balances.
    pub async fn create(conn: &mut PgConnection, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!("INSERT INTO users (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id<'e>(
        db: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Fetch and row-lock a user for the rest of the caller's transaction.
    ///
    /// Every balance mutation goes through this lock so concurrent requests
    /// for one user serialize at the database as well.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Persist a recomputed stamina state.
    pub async fn save_stamina(
        conn: &mut PgConnection,
        id: DbId,
        state: &StaminaState,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "UPDATE users SET stamina = $2, last_stamina_update = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(state.stamina)
            .bind(state.last_update)
            .fetch_one(conn)
            .await
    }

    /// Overwrite currency, level and stamina columns with ledger output.
    pub async fn save_balances(
        conn: &mut PgConnection,
        id: DbId,
        balances: &Balances,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                money = $2,
                star_jewels = $3,
                level = $4,
                exp = $5,
                max_exp = $6,
                stamina = $7,
                max_stamina = $8,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(balances.money)
            .bind(balances.star_jewels)
            .bind(balances.level)
            .bind(balances.exp)
            .bind(balances.max_exp)
            .bind(balances.stamina)
            .bind(balances.max_stamina)
            .fetch_one(conn)
            .await
    }

    pub async fn record_login(
        conn: &mut PgConnection,
        id: DbId,
        streak: i32,
        date: NaiveDate,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET login_streak = $2, last_login_date = $3, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(streak)
        .bind(date)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Users other than `exclude` that have at least one deck member, oldest first.
    pub async fn pvp_candidates<'e>(
        db: impl PgExecutor<'e>,
        exclude: DbId,
        limit: i64,
    ) -> Result<Vec<PvpCandidate>, sqlx::Error> {
        sqlx::query_as::<_, PvpCandidate>(
            "SELECT u.id, u.name FROM users u
             WHERE u.id <> $1
               AND EXISTS (SELECT 1 FROM deck_slots d WHERE d.user_id = u.id)
             ORDER BY u.id
             LIMIT $2",
        )
        .bind(exclude)
        .bind(limit)
        .fetch_all(db)
        .await
    }
}
