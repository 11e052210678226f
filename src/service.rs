//! Compound operations over the stores
//!
//! One logical operation per user action: fetch a snapshot, derive the
//! view, or apply a state-machine transition and emit its notification.
//! When a status update lands but the follow-up notification insert
//! fails, the exchange stays in its new state and the failure is logged
//! rather than retried; the two stores are not transactionally linked.

use crate::catalog::Catalog;
use crate::exchange::{
    compose_notice, compose_offer, transition, ExchangeEvent, TransitionError,
};
use crate::model::{Exchange, ExchangeStatus, Message, MessageType};
use crate::store::{ExchangeStore, MessageStore, NewExchange, NewMessage, StoreError};
use crate::threads::{build_conversations, Conversation};
use crate::unread::{count_unread, UnreadSummary};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("participant '{actor}' is not a party to exchange {exchange}")]
    NotParticipant { exchange: i64, actor: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// The conversation/negotiation core behind one store handle.
pub struct MarketService<S> {
    store: S,
}

impl<S: MessageStore + ExchangeStore> MarketService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The full conversation view for `me`, optionally narrowed to one
    /// message kind.
    pub async fn inbox(
        &self,
        me: &str,
        filter: Option<MessageType>,
    ) -> ServiceResult<Vec<Conversation>> {
        let messages = self.store.fetch_messages(me).await?;
        Ok(build_conversations(messages, me, filter))
    }

    /// Unread totals, recomputed from a fresh snapshot.
    pub async fn unread(&self, me: &str) -> ServiceResult<UnreadSummary> {
        let messages = self.store.fetch_messages(me).await?;
        Ok(count_unread(&messages, me))
    }

    /// Marks every unread inbound message from `counterpart` as read.
    /// Returns how many were flipped.
    pub async fn mark_conversation_read(
        &self,
        me: &str,
        counterpart: &str,
    ) -> ServiceResult<usize> {
        let messages = self.store.fetch_messages(me).await?;
        let ids: Vec<i64> = messages
            .iter()
            .filter(|m| m.is_unread_for(me) && m.from == counterpart)
            .map(|m| m.id)
            .collect();
        self.store.mark_read(&ids).await?;
        Ok(ids.len())
    }

    /// Sender-side soft delete.
    pub async fn delete_messages(&self, ids: &[i64]) -> ServiceResult<()> {
        self.store.tombstone(ids).await?;
        Ok(())
    }

    /// Plain chat message, optionally continuing a reply chain.
    pub async fn send_message(
        &self,
        from: &str,
        to: &str,
        body: &str,
        reply_to: Option<i64>,
    ) -> ServiceResult<Message> {
        let message = self
            .store
            .insert_message(NewMessage {
                from: from.to_string(),
                to: to.to_string(),
                body: body.to_string(),
                kind: MessageType::Chat,
                reply_to,
            })
            .await?;
        Ok(message)
    }

    /// Creates a new exchange offer and announces it to the provider.
    ///
    /// The announcement goes through the same degraded path as
    /// transition notifications: if its insert fails the exchange still
    /// exists, the provider just sees it one fetch later.
    pub async fn propose(&self, draft: NewExchange, catalog: &Catalog) -> ServiceResult<Exchange> {
        let exchange = self.store.insert_exchange(draft).await?;
        let body = compose_offer(&exchange, catalog);
        self.notify(&exchange.creator, &exchange.provider, exchange.id, body)
            .await;
        Ok(exchange)
    }

    /// Applies one state-machine event to an exchange on behalf of
    /// `actor` and notifies the counterpart when the transition calls
    /// for it.
    pub async fn apply(
        &self,
        exchange_id: i64,
        actor: &str,
        event: ExchangeEvent,
        catalog: &Catalog,
    ) -> ServiceResult<ExchangeStatus> {
        let exchange = self.store.get_exchange(exchange_id).await?;
        let counterpart = exchange
            .counterpart_of(actor)
            .ok_or_else(|| ServiceError::NotParticipant {
                exchange: exchange_id,
                actor: actor.to_string(),
            })?
            .to_string();

        let outcome = transition(exchange.status, event)?;
        self.store
            .update_exchange_status(exchange_id, outcome.new_status)
            .await?;

        if let Some(notice) = outcome.notice {
            let body = compose_notice(&exchange, &notice, catalog);
            self.notify(actor, &counterpart, exchange_id, body).await;
        }
        Ok(outcome.new_status)
    }

    /// Emits an exchange notification message. Failure here leaves the
    /// exchange in its already-updated state with the counterpart
    /// uninformed; that is an accepted degraded outcome, logged and not
    /// retried.
    async fn notify(&self, from: &str, to: &str, exchange_id: i64, body: String) {
        let draft = NewMessage {
            from: from.to_string(),
            to: to.to_string(),
            body,
            kind: MessageType::Exchange,
            reply_to: None,
        };
        if let Err(error) = self.store.insert_message(draft).await {
            tracing::warn!(exchange_id, %error, "notification not delivered");
        }
    }
}
