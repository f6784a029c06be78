use axum::{debug_handler, extract::State};

use crate::{ApiJson, AppResult, AppState, auth::OpenId, store::Store};

use super::RoomIdBody;

#[debug_handler(state = AppState)]
pub(crate) async fn join_room(
    State(store): State<Store>,
    OpenId(open_id): OpenId,
    ApiJson(RoomIdBody { room_id }): ApiJson<RoomIdBody>,
) -> AppResult<&'static str> {
    store.join_room(&open_id, room_id).await?;
    Ok("ok")
}
