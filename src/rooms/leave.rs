use axum::{Json, debug_handler, extract::State};
use serde::Serialize;

use crate::{ApiJson, AppResult, AppState, auth::OpenId, db::Standing, store::Store};

use super::RoomIdBody;

#[derive(Serialize)]
pub(crate) struct LeaveResponse {
    closed: bool,
    scores: Vec<Standing>,
}

/// Leaves the room. The owner leaving closes it; either way the caller gets
/// the standings as they were when they walked out.
#[debug_handler(state = AppState)]
pub(crate) async fn leave_room(
    State(store): State<Store>,
    OpenId(open_id): OpenId,
    ApiJson(RoomIdBody { room_id }): ApiJson<RoomIdBody>,
) -> AppResult<Json<LeaveResponse>> {
    let closed = store.leave_room(&open_id, room_id).await?;
    let scores = store.room_standings(room_id).await?;

    Ok(Json(LeaveResponse { closed, scores }))
}
