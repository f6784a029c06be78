use axum::{Json, debug_handler, extract::State};
use serde::Deserialize;

use crate::{ApiQuery, AppResult, AppState, db::RoomDetail, store::Store};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RoomQuery {
    room_id: i64,
}

/// Standings and transfer log of a room. Closed rooms stay readable.
#[debug_handler(state = AppState)]
pub(crate) async fn room(
    State(store): State<Store>,
    ApiQuery(RoomQuery { room_id }): ApiQuery<RoomQuery>,
) -> AppResult<Json<RoomDetail>> {
    Ok(Json(store.room_detail(room_id).await?))
}
