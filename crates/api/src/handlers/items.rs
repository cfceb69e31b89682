//! Handler for consumable items.

use axum::extract::State;
use axum::Json;
use idolsim_core::types::DbId;
use serde::Deserialize;

use crate::engine::items::{self, ItemUseResult};
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseItemRequest {
    pub user_id: DbId,
    pub item: String,
}

/// POST /api/v1/item/use
pub async fn use_item(
    State(state): State<AppState>,
    Json(input): Json<UseItemRequest>,
) -> AppResult<Json<ItemUseResult>> {
    Ok(Json(items::use_item(&state, input.user_id, &input.item).await?))
}
