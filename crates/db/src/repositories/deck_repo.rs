//! Repository for the `deck_slots` table.

use idolsim_core::deck::{Deck, DECK_SIZE};
use idolsim_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::deck::{DeckCard, DeckSlot};

pub struct DeckRepo;

impl DeckRepo {
    /// Load a user's deck. A user with no rows has an empty deck.
    pub async fn get<'e>(db: impl PgExecutor<'e>, user_id: DbId) -> Result<Deck, sqlx::Error> {
        let rows = sqlx::query_as::<_, DeckSlot>(
            "SELECT slot_index, idol_id FROM deck_slots WHERE user_id = $1 ORDER BY slot_index",
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;

        let mut slots = [None; DECK_SIZE];
        for row in rows {
            if let Some(slot) = slots.get_mut(row.slot_index as usize) {
                *slot = Some(row.idol_id);
            }
        }
        Ok(Deck::from_slots(slots))
    }

    /// Replace every slot of a user's deck.
    pub async fn replace(
        conn: &mut PgConnection,
        user_id: DbId,
        deck: &Deck,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM deck_slots WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        for (index, idol_id) in deck.slots.iter().enumerate() {
            let Some(idol_id) = idol_id else { continue };
            sqlx::query("INSERT INTO deck_slots (user_id, slot_index, idol_id) VALUES ($1, $2, $3)")
                .bind(user_id)
                .bind(index as i16)
                .bind(idol_id)
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }

    /// Free the slot holding `idol_id`. Returns `true` if it was in the deck.
    pub async fn remove_idol(
        conn: &mut PgConnection,
        user_id: DbId,
        idol_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM deck_slots WHERE user_id = $1 AND idol_id = $2")
            .bind(user_id)
            .bind(idol_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deck members joined with template stats, in slot order.
    pub async fn cards<'e>(
        db: impl PgExecutor<'e>,
        user_id: DbId,
    ) -> Result<Vec<DeckCard>, sqlx::Error> {
        sqlx::query_as::<_, DeckCard>(
            "SELECT d.slot_index, d.idol_id, t.name, t.rarity, t.idol_type,
                    t.vocal, t.dance, t.visual
             FROM deck_slots d
             JOIN idols i ON i.id = d.idol_id
             JOIN idol_templates t ON t.id = i.template_id
             WHERE d.user_id = $1
             ORDER BY d.slot_index",
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }
}
