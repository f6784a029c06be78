use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "openId")]
    pub openid: String,
    pub nickname: String,
    pub room_id: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    // unique: openid
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: i64,
    pub owner: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub opened: bool,
}

/// One member's balance in a room.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    #[serde(rename = "openId")]
    pub openid: String,
    pub nickname: String,
    pub score: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,

    // unique: openid, room_id
}

/// A transfer with both ends resolved to nicknames.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordEntry {
    pub id: i64,
    pub room_id: i64,
    pub score: i64,
    pub from_user: String,
    pub from_nickname: String,
    pub to_user: String,
    pub to_nickname: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A user's final (or running) score in one room.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub room_id: i64,
    pub score: i64,
    pub is_open: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// What `GET /api/room` shows: everything known about one room.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetail {
    pub users: Vec<Standing>,
    pub records: Vec<RecordEntry>,
    pub is_open: bool,
}
