//! Lavka core - conversation and negotiation engine for a
//! local-producer marketplace
//!
//! Reconstructs threaded conversations from a flat message stream,
//! derives unread totals, and runs the barter state machine whose
//! transitions notify the counterpart. Derivations are pure functions
//! over snapshots; durable state lives behind the async store traits in
//! [`store`].

pub mod catalog;
pub mod exchange;
pub mod model;
pub mod service;
pub mod store;
pub mod threads;
pub mod unread;

pub use catalog::{Catalog, ItemInfo};
pub use exchange::{ExchangeEvent, TransitionError};
pub use model::{Exchange, ExchangeKind, ExchangeStatus, ItemLine, Message, MessageType};
pub use service::{MarketService, ServiceError};
pub use store::{ExchangeStore, MessageStore, SqliteStore};
pub use threads::{build_conversations, Chain, Conversation};
pub use unread::{count_unread, UnreadSummary};
