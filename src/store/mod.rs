//! Persistence for users, rooms, balances and the transfer log.
//!
//! Every read-then-write sequence runs inside one `BEGIN IMMEDIATE`
//! transaction, so it holds the write lock from its first read and concurrent
//! writers queue on the busy timeout. Returning early with `?` drops the
//! transaction, which rolls it back.

mod ledger;
mod rooms;
mod users;

use std::{str::FromStr, time::Duration};

use anyhow::Context;
use sqlx::{
    Sqlite, SqliteConnection, SqlitePool, Transaction,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};

use crate::{AppError, AppResult, config::Config};

pub use ledger::Page;

/// Cloneable handle over the connection pool, passed to whoever needs the database.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Wraps a pool whose schema is already migrated.
    pub fn new(pool: SqlitePool) -> Store {
        Store { pool }
    }

    /// Opens (creating if missing) the configured database and applies migrations.
    pub async fn connect(config: &Config) -> anyhow::Result<Store> {
        let options = SqliteConnectOptions::from_str(&config.database)
            .with_context(|| format!("invalid database url {}", config.database))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .context("failed to connect to database")?;

        sqlx::migrate!()
            .run(&pool)
            .await
            .context("failed to run migrations")?;

        Ok(Store { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn begin_write(&self) -> AppResult<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin_with("BEGIN IMMEDIATE").await?)
    }
}

/// The room a user currently sits in. `NotFound` if the user is unknown.
async fn current_room(conn: &mut SqliteConnection, openid: &str) -> AppResult<Option<i64>> {
    let (room_id,): (Option<i64>,) = sqlx::query_as("SELECT room_id FROM users WHERE openid = ?")
        .bind(openid)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(AppError::NotFound("user"))?;

    Ok(room_id)
}

/// `None` if the room does not exist, otherwise its open flag.
async fn room_opened(conn: &mut SqliteConnection, room_id: i64) -> AppResult<Option<bool>> {
    let opened = sqlx::query_as::<_, (bool,)>("SELECT opened FROM rooms WHERE id = ?")
        .bind(room_id)
        .fetch_optional(&mut *conn)
        .await?
        .map(|(opened,)| opened);

    Ok(opened)
}
