//! Core data model for the conversation/negotiation subsystem
//!
//! Records here mirror what the stores persist. Messages are immutable
//! except for `is_read` (recipient side) and the tombstone transition of
//! `kind` to `Deleted` (sender side).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of message kinds.
///
/// `Deleted` is a soft tombstone, not a physical delete; tombstoned
/// messages are excluded from every derived view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Chat,
    Exchange,
    AdminStatus,
    FromAdmin,
    Income,
    CoinRequest,
    Order,
    Deleted,
}

impl MessageType {
    /// Every kind a live (non-tombstoned) message can have.
    pub const CONCRETE: [MessageType; 7] = [
        MessageType::Chat,
        MessageType::Exchange,
        MessageType::AdminStatus,
        MessageType::FromAdmin,
        MessageType::Income,
        MessageType::CoinRequest,
        MessageType::Order,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::Chat => "chat",
            MessageType::Exchange => "exchange",
            MessageType::AdminStatus => "admin_status",
            MessageType::FromAdmin => "from_admin",
            MessageType::Income => "income",
            MessageType::CoinRequest => "coin_request",
            MessageType::Order => "order",
            MessageType::Deleted => "deleted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "chat" => Some(MessageType::Chat),
            "exchange" => Some(MessageType::Exchange),
            "admin_status" => Some(MessageType::AdminStatus),
            "from_admin" => Some(MessageType::FromAdmin),
            "income" => Some(MessageType::Income),
            "coin_request" => Some(MessageType::CoinRequest),
            "order" => Some(MessageType::Order),
            "deleted" => Some(MessageType::Deleted),
            _ => None,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message between two participants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub from: String,
    pub to: String,
    pub body: String,
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub created_at: DateTime<Utc>,
    pub reply_to: Option<i64>,
    pub is_read: bool,
}

impl Message {
    /// The other side of this message relative to `me`.
    pub fn counterpart(&self, me: &str) -> &str {
        if self.from == me {
            &self.to
        } else {
            &self.from
        }
    }

    pub fn is_tombstoned(&self) -> bool {
        self.kind == MessageType::Deleted
    }

    /// Unread means: addressed to `me` and not yet read. Tombstones
    /// never count.
    pub fn is_unread_for(&self, me: &str) -> bool {
        !self.is_tombstoned() && self.to == me && !self.is_read
    }

    /// Sort key for all chronological ordering: `created_at` with `id`
    /// breaking ties.
    pub fn sort_key(&self) -> (DateTime<Utc>, i64) {
        (self.created_at, self.id)
    }
}

/// Goods-for-goods vs goods-for-coins offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeKind {
    Goods,
    Coins,
}

impl ExchangeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExchangeKind::Goods => "goods",
            ExchangeKind::Coins => "coins",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "goods" => Some(ExchangeKind::Goods),
            "coins" => Some(ExchangeKind::Coins),
            _ => None,
        }
    }
}

/// Exchange lifecycle status. Transitions only move forward, see
/// [`crate::exchange::transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeStatus {
    Created,
    OkMeeting,
    Reject,
    Finished,
}

impl ExchangeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ExchangeStatus::Created => "created",
            ExchangeStatus::OkMeeting => "ok_meeting",
            ExchangeStatus::Reject => "reject",
            ExchangeStatus::Finished => "finished",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created" => Some(ExchangeStatus::Created),
            "ok_meeting" => Some(ExchangeStatus::OkMeeting),
            "reject" => Some(ExchangeStatus::Reject),
            "finished" => Some(ExchangeStatus::Finished),
            _ => None,
        }
    }

    /// Terminal statuses accept no further transitions.
    pub fn is_closed(self) -> bool {
        matches!(self, ExchangeStatus::Reject | ExchangeStatus::Finished)
    }
}

impl fmt::Display for ExchangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of an offer: an opaque catalog item id and a quantity (>= 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemLine {
    pub item_id: String,
    pub qty: u32,
}

/// A barter/exchange offer between two participants.
///
/// Only `status` is mutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    pub id: i64,
    pub creator: String,
    pub provider: String,
    #[serde(rename = "type")]
    pub kind: ExchangeKind,
    pub status: ExchangeStatus,
    pub buyer_items: Vec<ItemLine>,
    pub provider_items: Vec<ItemLine>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Exchange {
    /// The other party relative to `participant`, or `None` if
    /// `participant` is not a party to this exchange.
    pub fn counterpart_of(&self, participant: &str) -> Option<&str> {
        if self.creator == participant {
            Some(&self.provider)
        } else if self.provider == participant {
            Some(&self.creator)
        } else {
            None
        }
    }
}
