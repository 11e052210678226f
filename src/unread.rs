//! Unread aggregation
//!
//! A single linear pass over a snapshot of the message list. Derived on
//! every read; holds no state. After any `mark_read` mutation the caller
//! recomputes, it never patches counts in place.

use crate::model::{Message, MessageType};
use std::collections::BTreeMap;

/// Unread totals, overall and per message kind.
///
/// `by_kind` carries every concrete kind as a key, zero-valued when
/// nothing is unread, so consumers can index without guarding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreadSummary {
    pub all: usize,
    pub by_kind: BTreeMap<MessageType, usize>,
}

impl UnreadSummary {
    pub fn kind(&self, kind: MessageType) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }
}

/// Counts messages addressed to `me` that are still unread.
pub fn count_unread(messages: &[Message], me: &str) -> UnreadSummary {
    let mut by_kind: BTreeMap<MessageType, usize> =
        MessageType::CONCRETE.iter().map(|&k| (k, 0)).collect();
    let mut all = 0;

    for msg in messages {
        if msg.is_unread_for(me) {
            all += 1;
            *by_kind.entry(msg.kind).or_insert(0) += 1;
        }
    }

    UnreadSummary { all, by_kind }
}
