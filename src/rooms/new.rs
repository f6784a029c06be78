use axum::{Json, debug_handler, extract::State};

use crate::{AppResult, AppState, auth::OpenId, store::Store};

/// Opens a room for the caller, or hands back the one they are already in.
#[debug_handler(state = AppState)]
pub(crate) async fn new_room(
    State(store): State<Store>,
    OpenId(open_id): OpenId,
) -> AppResult<Json<i64>> {
    let room_id = store.create_or_rejoin_room(&open_id).await?;
    Ok(Json(room_id))
}
