//! Mock stores for testing
//!
//! In-memory implementations of both store traits, with call recording
//! and failure injection so the service layer's compound operations can
//! be tested without SQLite.

use super::{
    ExchangeStore, MessageStore, NewExchange, NewMessage, StoreError, StoreResult,
};
use crate::model::{Exchange, ExchangeStatus, Message, MessageType};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::sync::Mutex;

/// In-memory message + exchange store.
#[derive(Default)]
pub struct MemoryStore {
    messages: Mutex<Vec<Message>>,
    exchanges: Mutex<Vec<Exchange>>,
    next_id: Mutex<i64>,
    /// When set, the next `insert_message` fails once. Used to exercise
    /// the degraded notification path.
    fail_next_insert: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_insert(&self) {
        *self.fail_next_insert.lock().unwrap() = true;
    }

    /// Seeds an exchange directly, bypassing the insert path.
    pub fn seed_exchange(&self, exchange: Exchange) {
        self.exchanges.lock().unwrap().push(exchange);
    }

    pub fn seed_message(&self, message: Message) {
        self.messages.lock().unwrap().push(message);
    }

    pub fn all_messages(&self) -> Vec<Message> {
        self.messages.lock().unwrap().clone()
    }

    fn bump_id(&self) -> i64 {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        *next + 1000
    }

    fn now_for(&self, id: i64) -> chrono::DateTime<Utc> {
        // Deterministic, strictly increasing timestamps.
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(id)
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn fetch_messages(&self, participant: &str) -> StoreResult<Vec<Message>> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.from == participant || m.to == participant)
            .cloned()
            .collect())
    }

    async fn mark_read(&self, ids: &[i64]) -> StoreResult<()> {
        let mut messages = self.messages.lock().unwrap();
        for msg in messages.iter_mut() {
            if ids.contains(&msg.id) {
                msg.is_read = true;
            }
        }
        Ok(())
    }

    async fn tombstone(&self, ids: &[i64]) -> StoreResult<()> {
        let mut messages = self.messages.lock().unwrap();
        for msg in messages.iter_mut() {
            if ids.contains(&msg.id) {
                msg.kind = MessageType::Deleted;
            }
        }
        Ok(())
    }

    async fn insert_message(&self, draft: NewMessage) -> StoreResult<Message> {
        {
            let mut fail = self.fail_next_insert.lock().unwrap();
            if *fail {
                *fail = false;
                return Err(StoreError::Unavailable("injected insert failure".into()));
            }
        }
        let id = self.bump_id();
        let message = Message {
            id,
            from: draft.from,
            to: draft.to,
            body: draft.body,
            kind: draft.kind,
            created_at: self.now_for(id),
            reply_to: draft.reply_to,
            is_read: false,
        };
        self.messages.lock().unwrap().push(message.clone());
        Ok(message)
    }
}

#[async_trait]
impl ExchangeStore for MemoryStore {
    async fn fetch_exchanges(&self, participant: &str) -> StoreResult<Vec<Exchange>> {
        Ok(self
            .exchanges
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.creator == participant || e.provider == participant)
            .cloned()
            .collect())
    }

    async fn get_exchange(&self, id: i64) -> StoreResult<Exchange> {
        self.exchanges
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(StoreError::ExchangeNotFound(id))
    }

    async fn update_exchange_status(&self, id: i64, status: ExchangeStatus) -> StoreResult<()> {
        let mut exchanges = self.exchanges.lock().unwrap();
        match exchanges.iter_mut().find(|e| e.id == id) {
            Some(exchange) => {
                exchange.status = status;
                Ok(())
            }
            None => Err(StoreError::ExchangeNotFound(id)),
        }
    }

    async fn insert_exchange(&self, draft: NewExchange) -> StoreResult<Exchange> {
        let id = self.bump_id();
        let exchange = Exchange {
            id,
            creator: draft.creator,
            provider: draft.provider,
            kind: draft.kind,
            status: ExchangeStatus::Created,
            buyer_items: draft.buyer_items,
            provider_items: draft.provider_items,
            comment: draft.comment,
            created_at: self.now_for(id),
        };
        self.exchanges.lock().unwrap().push(exchange.clone());
        Ok(exchange)
    }
}
