//! SQL schema and row mapping

use crate::model::{Exchange, ExchangeKind, ExchangeStatus, ItemLine, Message, MessageType};
use chrono::{DateTime, Utc};
use rusqlite::Row;

/// SQL schema for initialization. Idempotent; run on every open.
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    sender TEXT NOT NULL,
    recipient TEXT NOT NULL,
    body TEXT NOT NULL,
    type TEXT NOT NULL DEFAULT 'chat',
    reply_to INTEGER,
    is_read BOOLEAN NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_messages_sender ON messages(sender);
CREATE INDEX IF NOT EXISTS idx_messages_recipient ON messages(recipient);

CREATE TABLE IF NOT EXISTS exchanges (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    creator TEXT NOT NULL,
    provider TEXT NOT NULL,
    type TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'created',
    buyer_items TEXT NOT NULL,
    provider_items TEXT NOT NULL,
    comment TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_exchanges_creator ON exchanges(creator);
CREATE INDEX IF NOT EXISTS idx_exchanges_provider ON exchanges(provider);
";

/// Column list used by every message SELECT, in `message_from_row`
/// order.
pub const MESSAGE_COLUMNS: &str =
    "id, sender, recipient, body, type, reply_to, is_read, created_at";

/// Column list used by every exchange SELECT, in `exchange_from_row`
/// order.
pub const EXCHANGE_COLUMNS: &str =
    "id, creator, provider, type, status, buyer_items, provider_items, comment, created_at";

pub fn message_from_row(row: &Row<'_>) -> rusqlite::Result<Message> {
    let kind: String = row.get(4)?;
    Ok(Message {
        id: row.get(0)?,
        from: row.get(1)?,
        to: row.get(2)?,
        body: row.get(3)?,
        // Unknown kinds in old rows degrade to chat rather than failing
        // the whole fetch.
        kind: MessageType::parse(&kind).unwrap_or(MessageType::Chat),
        reply_to: row.get(5)?,
        is_read: row.get(6)?,
        created_at: parse_datetime(&row.get::<_, String>(7)?),
    })
}

pub fn exchange_from_row(row: &Row<'_>) -> rusqlite::Result<Exchange> {
    let kind: String = row.get(3)?;
    let status: String = row.get(4)?;
    let buyer_items: String = row.get(5)?;
    let provider_items: String = row.get(6)?;
    Ok(Exchange {
        id: row.get(0)?,
        creator: row.get(1)?,
        provider: row.get(2)?,
        kind: ExchangeKind::parse(&kind).unwrap_or(ExchangeKind::Goods),
        status: ExchangeStatus::parse(&status).unwrap_or(ExchangeStatus::Created),
        buyer_items: parse_items(&buyer_items),
        provider_items: parse_items(&provider_items),
        comment: row.get(7)?,
        created_at: parse_datetime(&row.get::<_, String>(8)?),
    })
}

/// Item lists are stored as JSON TEXT; corrupt rows degrade to empty
/// lists.
fn parse_items(json: &str) -> Vec<ItemLine> {
    serde_json::from_str(json).unwrap_or_default()
}

pub fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}
