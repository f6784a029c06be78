use sqlx::SqliteConnection;

use crate::{
    AppError, AppResult, TransferSide,
    db::{HistoryEntry, RecordEntry, RoomDetail, Standing},
};

use super::{Store, room_opened, rooms::fetch_room};

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// 1-based page of a user's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub page_size: i64,
}

impl Default for Page {
    fn default() -> Self {
        Page {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Page {
    /// Missing values fall back to the defaults; the size is capped at `MAX_PAGE_SIZE`.
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> AppResult<Page> {
        let page = page.unwrap_or(1);
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page < 1 {
            return Err(AppError::bad_request("page must be at least 1"));
        }
        if page_size < 1 {
            return Err(AppError::bad_request("pageSize must be at least 1"));
        }

        Ok(Page {
            page,
            page_size: page_size.min(MAX_PAGE_SIZE),
        })
    }

    fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

async fn adjust_balance(
    conn: &mut SqliteConnection,
    room_id: i64,
    openid: &str,
    delta: i64,
    side: TransferSide,
) -> AppResult<()> {
    let updated = sqlx::query(
        "UPDATE scores
         SET score = score + ?, updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
         WHERE openid = ? AND room_id = ?",
    )
    .bind(delta)
    .bind(openid)
    .bind(room_id)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    if updated != 1 {
        return Err(AppError::UserNotInRoom(side, room_id));
    }
    Ok(())
}

/// Balance of a user who currently sits in `room_id`.
async fn member_balance(
    conn: &mut SqliteConnection,
    room_id: i64,
    openid: &str,
    side: TransferSide,
) -> AppResult<i64> {
    let balance: Option<(i64,)> = sqlx::query_as(
        "SELECT s.score
         FROM users u
         INNER JOIN scores s ON s.openid = u.openid AND s.room_id = u.room_id
         WHERE u.openid = ? AND u.room_id = ?",
    )
    .bind(openid)
    .bind(room_id)
    .fetch_optional(&mut *conn)
    .await?;

    balance
        .map(|(score,)| score)
        .ok_or(AppError::UserNotInRoom(side, room_id))
}

async fn standings(conn: &mut SqliteConnection, room_id: i64) -> AppResult<Vec<Standing>> {
    let standings = sqlx::query_as::<_, Standing>(
        "SELECT s.openid, u.nickname, s.score, s.updated_at
         FROM scores s
         INNER JOIN users u ON u.openid = s.openid
         WHERE s.room_id = ?
         ORDER BY s.updated_at DESC, s.id DESC",
    )
    .bind(room_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(standings)
}

async fn records(conn: &mut SqliteConnection, room_id: i64) -> AppResult<Vec<RecordEntry>> {
    let records = sqlx::query_as::<_, RecordEntry>(
        "SELECT r.id, r.room_id, r.score,
                r.from_user, f.nickname AS from_nickname,
                r.to_user, t.nickname AS to_nickname,
                r.created_at
         FROM records r
         INNER JOIN users f ON f.openid = r.from_user
         INNER JOIN users t ON t.openid = r.to_user
         WHERE r.room_id = ?
         ORDER BY r.created_at DESC, r.id DESC",
    )
    .bind(room_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(records)
}

impl Store {
    /// Moves `amount` points from `from_user` to `to_user` and logs the transfer.
    ///
    /// This is the only place balances change. Both users must currently sit
    /// in the open room `room_id`; balances may go negative but must stay
    /// within `i64`. Returns the id of the new record.
    pub async fn post_transfer(
        &self,
        room_id: i64,
        from_user: &str,
        to_user: &str,
        amount: i64,
    ) -> AppResult<i64> {
        if amount <= 0 {
            return Err(AppError::bad_request("score must be positive"));
        }
        if from_user == to_user {
            return Err(AppError::bad_request("fromUser and toUser must differ"));
        }

        let mut tx = self.begin_write().await?;

        let opened = room_opened(&mut tx, room_id)
            .await?
            .ok_or(AppError::NotFound("room"))?;
        if !opened {
            return Err(AppError::RoomClosed(room_id));
        }

        let from_balance = member_balance(&mut tx, room_id, from_user, TransferSide::From).await?;
        let to_balance = member_balance(&mut tx, room_id, to_user, TransferSide::To).await?;

        // SQLite would silently turn an overflowing sum into REAL
        if from_balance.checked_sub(amount).is_none() || to_balance.checked_add(amount).is_none() {
            return Err(AppError::bad_request("score would overflow a balance"));
        }

        adjust_balance(&mut tx, room_id, from_user, -amount, TransferSide::From).await?;
        adjust_balance(&mut tx, room_id, to_user, amount, TransferSide::To).await?;

        let record_id = sqlx::query(
            "INSERT INTO records (room_id, score, from_user, to_user) VALUES (?, ?, ?, ?)",
        )
        .bind(room_id)
        .bind(amount)
        .bind(from_user)
        .bind(to_user)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;

        tracing::info!(room_id, from_user, to_user, amount, record_id, "transfer posted");
        Ok(record_id)
    }

    /// Balances in the room, most recently changed first.
    pub async fn room_standings(&self, room_id: i64) -> AppResult<Vec<Standing>> {
        let mut conn = self.pool.acquire().await?;
        room_opened(&mut conn, room_id)
            .await?
            .ok_or(AppError::NotFound("room"))?;

        standings(&mut conn, room_id).await
    }

    /// Transfer log of the room, newest first.
    pub async fn room_history(&self, room_id: i64) -> AppResult<Vec<RecordEntry>> {
        let mut conn = self.pool.acquire().await?;
        room_opened(&mut conn, room_id)
            .await?
            .ok_or(AppError::NotFound("room"))?;

        records(&mut conn, room_id).await
    }

    /// Open flag, standings and transfer log of a room, read from one snapshot.
    pub async fn room_detail(&self, room_id: i64) -> AppResult<RoomDetail> {
        let mut tx = self.pool.begin().await?;

        let room = fetch_room(&mut tx, room_id).await?;
        let users = standings(&mut tx, room_id).await?;
        let records = records(&mut tx, room_id).await?;

        tx.commit().await?;

        Ok(RoomDetail {
            users,
            records,
            is_open: room.opened,
        })
    }

    /// The user's score in every room they have joined, newest room first.
    pub async fn user_history(&self, openid: &str, page: Page) -> AppResult<Vec<HistoryEntry>> {
        let mut conn = self.pool.acquire().await?;
        super::current_room(&mut conn, openid).await?;

        let history = sqlx::query_as::<_, HistoryEntry>(
            "SELECT s.room_id, s.score, r.opened AS is_open, s.created_at
             FROM scores s
             INNER JOIN rooms r ON r.id = s.room_id
             WHERE s.openid = ?
             ORDER BY s.created_at DESC, s.id DESC
             LIMIT ? OFFSET ?",
        )
        .bind(openid)
        .bind(page.page_size)
        .bind(page.offset())
        .fetch_all(&mut *conn)
        .await?;

        Ok(history)
    }
}
