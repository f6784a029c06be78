use std::fmt;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::auth::WeChatError;

pub type AppResult<T> = Result<T, AppError>;

/// Which end of a transfer failed a membership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferSide {
    From,
    To,
}

impl fmt::Display for TransferSide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransferSide::From => f.write_str("fromUser"),
            TransferSide::To => f.write_str("toUser"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("room {0} is closed")]
    RoomClosed(i64),

    #[error("already in room {0}")]
    AlreadyInRoom(i64),

    #[error("already in another room ({0}), leave it first")]
    InAnotherRoom(i64),

    #[error("not in room {0}")]
    NotInRoom(i64),

    #[error("{0} is not in room {1}")]
    UserNotInRoom(TransferSide, i64),

    #[error(transparent)]
    WeChat(#[from] WeChatError),

    /// Driver text is logged, never sent to the client.
    #[error("an internal database error occurred")]
    Sqlx(#[from] sqlx::Error),

    #[error("an internal server error occurred")]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        use AppError::*;

        match self {
            BadRequest(_) => StatusCode::BAD_REQUEST,
            NotFound(_) => StatusCode::NOT_FOUND,
            RoomClosed(_) | AlreadyInRoom(_) | InAnotherRoom(_) | NotInRoom(_)
            | UserNotInRoom(..) => StatusCode::CONFLICT,
            WeChat(WeChatError::Rejected { .. }) => StatusCode::BAD_REQUEST,
            WeChat(_) => StatusCode::BAD_GATEWAY,
            Sqlx(_) | Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        use AppError::*;

        match self {
            BadRequest(_) => "BAD_REQUEST",
            NotFound(_) => "NOT_FOUND",
            RoomClosed(_) => "ROOM_CLOSED",
            AlreadyInRoom(_) => "ALREADY_IN_ROOM",
            InAnotherRoom(_) => "IN_ANOTHER_ROOM",
            NotInRoom(_) => "NOT_IN_ROOM",
            UserNotInRoom(..) => "USER_NOT_IN_ROOM",
            WeChat(WeChatError::Rejected { .. }) => "WECHAT_REJECTED",
            WeChat(_) => "WECHAT_UNAVAILABLE",
            Sqlx(_) => "DATABASE",
            Anyhow(_) => "INTERNAL",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::warn!(code = self.code(), "{self}");
        }

        (
            status,
            Json(ErrorBody {
                code: self.code(),
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
