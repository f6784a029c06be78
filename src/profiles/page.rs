use axum::{
    Json, debug_handler,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{ApiJson, AppResult, AppState, auth::OpenId, store::Store};

#[derive(Deserialize)]
pub(crate) struct NicknameRequest {
    nickname: String,
}

/// The caller's current room id, or 204 when they are not in one.
#[debug_handler(state = AppState)]
pub(crate) async fn user_room(
    State(store): State<Store>,
    OpenId(open_id): OpenId,
) -> AppResult<Response> {
    Ok(match store.user_room(&open_id).await? {
        Some(room_id) => Json(room_id).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

#[debug_handler(state = AppState)]
pub(crate) async fn update_nickname(
    State(store): State<Store>,
    OpenId(open_id): OpenId,
    ApiJson(NicknameRequest { nickname }): ApiJson<NicknameRequest>,
) -> AppResult<&'static str> {
    store.update_nickname(&open_id, &nickname).await?;
    Ok("ok")
}
