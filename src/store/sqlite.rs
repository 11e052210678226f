//! SQLite-backed store
//!
//! Single connection behind a mutex; the core is single-writer per
//! process (cross-process races resolve last-write-wins at this layer,
//! there is no version compare). The async trait methods do their work
//! synchronously under the lock; none of them await while holding it.

use super::schema::{
    exchange_from_row, message_from_row, parse_datetime, EXCHANGE_COLUMNS, MESSAGE_COLUMNS, SCHEMA,
};
use super::{
    ExchangeStore, MessageStore, NewExchange, NewMessage, StoreError, StoreResult,
};
use crate::model::{Exchange, ExchangeStatus, Message, MessageType};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Thread-safe handle to the SQLite store. Cloning shares the
/// connection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create the store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        tracing::info!(path = %path.as_ref().display(), "opening store");
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }
}

#[async_trait]
impl MessageStore for SqliteStore {
    async fn fetch_messages(&self, participant: &str) -> StoreResult<Vec<Message>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages
             WHERE sender = ?1 OR recipient = ?1
             ORDER BY datetime(created_at) ASC, id ASC"
        ))?;
        let rows = stmt.query_map(params![participant], message_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    async fn mark_read(&self, ids: &[i64]) -> StoreResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("UPDATE messages SET is_read = 1 WHERE id = ?1")?;
        for id in ids {
            stmt.execute(params![id])?;
        }
        Ok(())
    }

    async fn tombstone(&self, ids: &[i64]) -> StoreResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("UPDATE messages SET type = ?1 WHERE id = ?2")?;
        for id in ids {
            stmt.execute(params![MessageType::Deleted.as_str(), id])?;
        }
        Ok(())
    }

    async fn insert_message(&self, draft: NewMessage) -> StoreResult<Message> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now();
        conn.execute(
            "INSERT INTO messages (sender, recipient, body, type, reply_to, is_read, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
            params![
                draft.from,
                draft.to,
                draft.body,
                draft.kind.as_str(),
                draft.reply_to,
                now.to_rfc3339(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        Ok(Message {
            id,
            from: draft.from,
            to: draft.to,
            body: draft.body,
            kind: draft.kind,
            created_at: parse_datetime(&now.to_rfc3339()),
            reply_to: draft.reply_to,
            is_read: false,
        })
    }
}

#[async_trait]
impl ExchangeStore for SqliteStore {
    async fn fetch_exchanges(&self, participant: &str) -> StoreResult<Vec<Exchange>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {EXCHANGE_COLUMNS} FROM exchanges
             WHERE creator = ?1 OR provider = ?1
             ORDER BY datetime(created_at) DESC, id DESC"
        ))?;
        let rows = stmt.query_map(params![participant], exchange_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    async fn get_exchange(&self, id: i64) -> StoreResult<Exchange> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {EXCHANGE_COLUMNS} FROM exchanges WHERE id = ?1"
        ))?;
        stmt.query_row(params![id], exchange_from_row)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::ExchangeNotFound(id),
                other => StoreError::Sqlite(other),
            })
    }

    async fn update_exchange_status(&self, id: i64, status: ExchangeStatus) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE exchanges SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        if changed == 0 {
            return Err(StoreError::ExchangeNotFound(id));
        }
        Ok(())
    }

    async fn insert_exchange(&self, draft: NewExchange) -> StoreResult<Exchange> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now();
        let buyer_items = serde_json::to_string(&draft.buyer_items).unwrap_or_default();
        let provider_items = serde_json::to_string(&draft.provider_items).unwrap_or_default();
        conn.execute(
            "INSERT INTO exchanges (creator, provider, type, status, buyer_items, provider_items, comment, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                draft.creator,
                draft.provider,
                draft.kind.as_str(),
                ExchangeStatus::Created.as_str(),
                buyer_items,
                provider_items,
                draft.comment,
                now.to_rfc3339(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        Ok(Exchange {
            id,
            creator: draft.creator,
            provider: draft.provider,
            kind: draft.kind,
            status: ExchangeStatus::Created,
            buyer_items: draft.buyer_items,
            provider_items: draft.provider_items,
            comment: draft.comment,
            created_at: parse_datetime(&now.to_rfc3339()),
        })
    }
}
