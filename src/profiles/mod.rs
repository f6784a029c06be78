mod history;
mod page;

use axum::{
    Router,
    routing::{get, put},
};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/userRoom", get(page::user_room))
        .route("/nickname", put(page::update_nickname))
        .route("/history", get(history::history))
}
