mod join;
mod leave;
mod new;
mod record;
mod room;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Deserialize;

use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RoomIdBody {
    pub(crate) room_id: i64,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/room",
            get(room::room).post(new::new_room).delete(leave::leave_room),
        )
        .route("/joinRoom", post(join::join_room))
        .route("/record", post(record::post_record))
}
