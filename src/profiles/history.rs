use axum::{Json, debug_handler, extract::State};
use serde::Deserialize;

use crate::{
    ApiQuery, AppResult, AppState,
    auth::OpenId,
    db::HistoryEntry,
    store::{Page, Store},
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HistoryQuery {
    page: Option<i64>,
    page_size: Option<i64>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn history(
    State(store): State<Store>,
    OpenId(open_id): OpenId,
    ApiQuery(HistoryQuery { page, page_size }): ApiQuery<HistoryQuery>,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    let page = Page::new(page, page_size)?;
    Ok(Json(store.user_history(&open_id, page).await?))
}
