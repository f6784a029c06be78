use crate::{AppError, AppResult, db::User};

use super::Store;

const MAX_NICKNAME_CHARS: usize = 32;

fn validate_nickname(nickname: &str) -> AppResult<&str> {
    let nickname = nickname.trim();
    if nickname.is_empty() {
        return Err(AppError::bad_request("nickname is required"));
    }
    if nickname.chars().count() > MAX_NICKNAME_CHARS {
        return Err(AppError::bad_request(format!(
            "nickname must be at most {MAX_NICKNAME_CHARS} characters"
        )));
    }
    Ok(nickname)
}

impl Store {
    /// Registers `openid` on first sight and returns the stored user either way.
    /// `nickname` only applies to, and is only validated for, a user created by
    /// this call.
    pub async fn ensure_user(&self, openid: &str, nickname: &str) -> AppResult<User> {
        match self.user(openid).await {
            Err(AppError::NotFound(_)) => {}
            known => return known,
        }

        let nickname = validate_nickname(nickname)?;

        let inserted = sqlx::query(
            "INSERT INTO users (openid, nickname) VALUES (?, ?) ON CONFLICT (openid) DO NOTHING",
        )
        .bind(openid)
        .bind(nickname)
        .execute(&self.pool)
        .await?
        .rows_affected()
            == 1;

        if inserted {
            tracing::info!(openid, nickname, "registered user");
        }

        self.user(openid).await
    }

    pub async fn user(&self, openid: &str) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "SELECT openid, nickname, room_id, created_at FROM users WHERE openid = ?",
        )
        .bind(openid)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("user"))
    }

    pub async fn user_room(&self, openid: &str) -> AppResult<Option<i64>> {
        let mut conn = self.pool.acquire().await?;
        super::current_room(&mut conn, openid).await
    }

    pub async fn update_nickname(&self, openid: &str, nickname: &str) -> AppResult<()> {
        let nickname = validate_nickname(nickname)?;

        let updated = sqlx::query("UPDATE users SET nickname = ? WHERE openid = ?")
            .bind(nickname)
            .bind(openid)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if updated == 0 {
            return Err(AppError::NotFound("user"));
        }
        Ok(())
    }
}
