use sqlx::SqliteConnection;

use crate::{AppError, AppResult, db::Room};

use super::{Store, current_room, room_opened};

async fn insert_score(conn: &mut SqliteConnection, openid: &str, room_id: i64) -> AppResult<()> {
    // a user coming back to a room keeps the row from their earlier visit
    sqlx::query("INSERT INTO scores (openid, room_id) VALUES (?, ?) ON CONFLICT (openid, room_id) DO NOTHING")
        .bind(openid)
        .bind(room_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub(super) async fn fetch_room(conn: &mut SqliteConnection, room_id: i64) -> AppResult<Room> {
    sqlx::query_as::<_, Room>("SELECT id, owner, created_at, opened FROM rooms WHERE id = ?")
        .bind(room_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(AppError::NotFound("room"))
}

impl Store {
    pub async fn room(&self, room_id: i64) -> AppResult<Room> {
        let mut conn = self.pool.acquire().await?;
        fetch_room(&mut conn, room_id).await
    }

    /// Returns the user's open room, or opens a new one owned by them.
    pub async fn create_or_rejoin_room(&self, openid: &str) -> AppResult<i64> {
        let mut tx = self.begin_write().await?;

        if let Some(room_id) = current_room(&mut tx, openid).await? {
            if room_opened(&mut tx, room_id).await? == Some(true) {
                return Ok(room_id);
            }
        }

        let room_id = sqlx::query("INSERT INTO rooms (owner) VALUES (?)")
            .bind(openid)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        sqlx::query("UPDATE users SET room_id = ? WHERE openid = ?")
            .bind(room_id)
            .bind(openid)
            .execute(&mut *tx)
            .await?;

        insert_score(&mut tx, openid, room_id).await?;

        tx.commit().await?;

        tracing::info!(room_id, owner = openid, "room created");
        Ok(room_id)
    }

    pub async fn join_room(&self, openid: &str, room_id: i64) -> AppResult<()> {
        let mut tx = self.begin_write().await?;

        let opened = room_opened(&mut tx, room_id)
            .await?
            .ok_or(AppError::NotFound("room"))?;
        if !opened {
            return Err(AppError::RoomClosed(room_id));
        }

        match current_room(&mut tx, openid).await? {
            Some(current) if current == room_id => return Err(AppError::AlreadyInRoom(room_id)),
            Some(current) => return Err(AppError::InAnotherRoom(current)),
            None => {}
        }

        sqlx::query("UPDATE users SET room_id = ? WHERE openid = ?")
            .bind(room_id)
            .bind(openid)
            .execute(&mut *tx)
            .await?;

        insert_score(&mut tx, openid, room_id).await?;

        tx.commit().await?;

        tracing::info!(room_id, openid, "joined room");
        Ok(())
    }

    /// Takes the user out of `room_id`. When the owner leaves, the room closes
    /// for every member; the return value says whether that happened.
    pub async fn leave_room(&self, openid: &str, room_id: i64) -> AppResult<bool> {
        let mut tx = self.begin_write().await?;

        if current_room(&mut tx, openid).await? != Some(room_id) {
            return Err(AppError::NotInRoom(room_id));
        }

        let (owner,): (String,) = sqlx::query_as("SELECT owner FROM rooms WHERE id = ?")
            .bind(room_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound("room"))?;

        let closed = owner == openid;
        if closed {
            sqlx::query("UPDATE users SET room_id = NULL WHERE room_id = ?")
                .bind(room_id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("UPDATE rooms SET opened = FALSE WHERE id = ?")
                .bind(room_id)
                .execute(&mut *tx)
                .await?;
        } else {
            sqlx::query("UPDATE users SET room_id = NULL WHERE openid = ?")
                .bind(openid)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        if closed {
            tracing::info!(room_id, owner = openid, "room closed");
        } else {
            tracing::info!(room_id, openid, "left room");
        }
        Ok(closed)
    }
}
