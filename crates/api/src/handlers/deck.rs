//! Handlers for the battle/work deck.

use axum::extract::{Path, State};
use axum::Json;
use idolsim_core::deck::DECK_SIZE;
use idolsim_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::engine::deck;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Card id as sent by clients, which use both strings and numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CardId {
    Number(DbId),
    Text(String),
}

impl CardId {
    fn parse(&self) -> Result<DbId, AppError> {
        match self {
            CardId::Number(id) => Ok(*id),
            CardId::Text(raw) => raw
                .trim()
                .parse()
                .map_err(|_| AppError::BadRequest(format!("Invalid card id '{raw}'"))),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDeckRequest {
    pub user_id: DbId,
    pub card_ids: Vec<CardId>,
}

#[derive(Debug, Serialize)]
pub struct SetDeckResponse {
    pub success: bool,
    pub deck: [Option<String>; DECK_SIZE],
}

/// GET /api/v1/user/{id}/deck
///
/// Four slots, ids as strings, empty slots as null.
pub async fn get_deck(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<[Option<String>; DECK_SIZE]>> {
    Ok(Json(deck::get(&state, user_id).await?))
}

/// POST /api/v1/deck
pub async fn set_deck(
    State(state): State<AppState>,
    Json(input): Json<SetDeckRequest>,
) -> AppResult<Json<SetDeckResponse>> {
    let ids = input
        .card_ids
        .iter()
        .map(CardId::parse)
        .collect::<Result<Vec<_>, _>>()?;
    let deck = deck::set(&state, input.user_id, ids).await?;
    Ok(Json(SetDeckResponse {
        success: true,
        deck: deck.as_client_slots(),
    }))
}
