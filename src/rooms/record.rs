use axum::{debug_handler, extract::State};
use serde::Deserialize;

use crate::{ApiJson, AppResult, AppState, store::Store};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecordRequest {
    room_id: i64,
    score: i64,
    from_user: String,
    to_user: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn post_record(
    State(store): State<Store>,
    ApiJson(RecordRequest {
        room_id,
        score,
        from_user,
        to_user,
    }): ApiJson<RecordRequest>,
) -> AppResult<&'static str> {
    store
        .post_transfer(room_id, &from_user, &to_user, score)
        .await?;
    Ok("ok")
}
