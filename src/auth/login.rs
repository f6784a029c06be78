use std::sync::Arc;

use axum::{Json, debug_handler, extract::State};
use serde::{Deserialize, Serialize};

use crate::{ApiJson, AppError, AppResult, AppState, store::Store};

use super::{CodeExchange, default_nickname};

#[derive(Deserialize)]
pub(crate) struct LoginRequest {
    #[serde(default)]
    code: String,
    nickname: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginResponse {
    open_id: String,
    room_id: Option<i64>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn login(
    State(store): State<Store>,
    State(wechat): State<Arc<dyn CodeExchange>>,
    ApiJson(LoginRequest { code, nickname }): ApiJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let code = code.trim();
    if code.is_empty() {
        return Err(AppError::bad_request("code is required"));
    }

    let open_id = wechat.code_to_session(code).await?;

    let nickname = match nickname {
        Some(nickname) if !nickname.trim().is_empty() => nickname,
        _ => default_nickname(&open_id),
    };
    let user = store.ensure_user(&open_id, &nickname).await?;

    tracing::debug!(open_id = %open_id, room_id = ?user.room_id, "login");

    Ok(Json(LoginResponse {
        open_id: user.openid,
        room_id: user.room_id,
    }))
}
