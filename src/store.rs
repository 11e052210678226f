//! Store boundary
//!
//! The durable collaborators the core talks to: the message store and
//! the exchange store. Both are async trait seams so the service layer
//! can be exercised against mocks; [`SqliteStore`] is the production
//! implementation backing both.

mod schema;
mod sqlite;

#[cfg(test)]
pub mod testing;

pub use sqlite::SqliteStore;

use crate::model::{Exchange, ExchangeKind, ExchangeStatus, ItemLine, Message, MessageType};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Exchange not found: {0}")]
    ExchangeNotFound(i64),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Fields for inserting a message; the store assigns `id`,
/// `created_at` and the initial unread flag.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub from: String,
    pub to: String,
    pub body: String,
    pub kind: MessageType,
    pub reply_to: Option<i64>,
}

/// Fields for inserting an exchange; the store assigns `id`,
/// `created_at` and the initial `created` status.
#[derive(Debug, Clone)]
pub struct NewExchange {
    pub creator: String,
    pub provider: String,
    pub kind: ExchangeKind,
    pub buyer_items: Vec<ItemLine>,
    pub provider_items: Vec<ItemLine>,
    pub comment: Option<String>,
}

/// Durable, append-only message collection.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// All messages the participant sent or received.
    async fn fetch_messages(&self, participant: &str) -> StoreResult<Vec<Message>>;

    /// Bulk flip of the read flag; recipient-side mutation only.
    async fn mark_read(&self, ids: &[i64]) -> StoreResult<()>;

    /// Soft delete: flips `type` to `deleted`, keeps the row.
    async fn tombstone(&self, ids: &[i64]) -> StoreResult<()>;

    async fn insert_message(&self, draft: NewMessage) -> StoreResult<Message>;
}

/// Durable record of exchange offers.
#[async_trait]
pub trait ExchangeStore: Send + Sync {
    /// All exchanges the participant is a party to, either side.
    async fn fetch_exchanges(&self, participant: &str) -> StoreResult<Vec<Exchange>>;

    async fn get_exchange(&self, id: i64) -> StoreResult<Exchange>;

    /// Updates only the status column; every other field is immutable
    /// after creation.
    async fn update_exchange_status(&self, id: i64, status: ExchangeStatus) -> StoreResult<()>;

    async fn insert_exchange(&self, draft: NewExchange) -> StoreResult<Exchange>;
}
