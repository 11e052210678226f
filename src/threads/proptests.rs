//! Property-based tests for the thread builder
//!
//! These check the structural invariants over arbitrary (including
//! malformed) `reply_to` graphs: nothing is lost, nothing is claimed
//! twice, orderings hold, traversal terminates.

use super::*;
use crate::model::{Message, MessageType};
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

const VIEWER: &str = "p";
const COUNTERPARTS: [&str; 3] = ["q", "r", "s"];

#[derive(Debug, Clone)]
struct RawMessage {
    counterpart: usize,
    outbound: bool,
    reply_to_raw: i64,
    at_secs: i64,
    kind: MessageType,
    is_read: bool,
}

fn arb_kind() -> impl Strategy<Value = MessageType> {
    prop_oneof![
        Just(MessageType::Chat),
        Just(MessageType::Exchange),
        Just(MessageType::Order),
        Just(MessageType::Deleted),
    ]
}

fn arb_raw_message() -> impl Strategy<Value = RawMessage> {
    (
        0usize..COUNTERPARTS.len(),
        any::<bool>(),
        // Deliberately wider than the id range so replies may point at
        // missing ids, themselves, or later messages (cycles).
        0i64..40,
        0i64..1000,
        arb_kind(),
        any::<bool>(),
    )
        .prop_map(
            |(counterpart, outbound, reply_to_raw, at_secs, kind, is_read)| RawMessage {
                counterpart,
                outbound,
                reply_to_raw,
                at_secs,
                kind,
                is_read,
            },
        )
}

fn materialize(raw: Vec<RawMessage>) -> Vec<Message> {
    raw.into_iter()
        .enumerate()
        .map(|(idx, r)| {
            let id = i64::try_from(idx).unwrap() + 1;
            let other = COUNTERPARTS[r.counterpart];
            let (from, to) = if r.outbound {
                (VIEWER, other)
            } else {
                (other, VIEWER)
            };
            Message {
                id,
                from: from.to_string(),
                to: to.to_string(),
                body: format!("msg {id}"),
                kind: r.kind,
                created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap()
                    + Duration::seconds(r.at_secs),
                // A third of messages are roots; the rest point
                // somewhere arbitrary.
                reply_to: (r.reply_to_raw % 3 != 0).then_some(r.reply_to_raw),
                is_read: r.is_read,
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn every_live_message_lands_in_exactly_one_chain(
        raw in prop::collection::vec(arb_raw_message(), 0..60)
    ) {
        let messages = materialize(raw);
        let live: Vec<i64> = messages
            .iter()
            .filter(|m| !m.is_tombstoned())
            .map(|m| m.id)
            .collect();

        let conversations = build_conversations(messages, VIEWER, None);

        let mut seen: HashSet<i64> = HashSet::new();
        for conv in &conversations {
            for chain in &conv.chains {
                prop_assert!(!chain.messages.is_empty());
                for msg in &chain.messages {
                    prop_assert!(seen.insert(msg.id), "message {} in two chains", msg.id);
                }
            }
        }
        prop_assert_eq!(seen.len(), live.len());
        for id in live {
            prop_assert!(seen.contains(&id), "message {} lost", id);
        }
    }

    #[test]
    fn chain_members_are_chronological(
        raw in prop::collection::vec(arb_raw_message(), 0..60)
    ) {
        let conversations = build_conversations(materialize(raw), VIEWER, None);
        for conv in &conversations {
            for chain in &conv.chains {
                for pair in chain.messages.windows(2) {
                    prop_assert!(pair[0].sort_key() <= pair[1].sort_key());
                }
            }
        }
    }

    #[test]
    fn conversations_and_chains_sorted_by_recency(
        raw in prop::collection::vec(arb_raw_message(), 0..60)
    ) {
        let conversations = build_conversations(materialize(raw), VIEWER, None);
        for pair in conversations.windows(2) {
            prop_assert!(pair[0].latest.sort_key() >= pair[1].latest.sort_key());
        }
        for conv in &conversations {
            prop_assert_eq!(conv.latest.id, conv.messages[conv.messages.len() - 1].id);
            for pair in conv.chains.windows(2) {
                prop_assert!(pair[0].last().sort_key() >= pair[1].last().sort_key());
            }
        }
    }

    #[test]
    fn type_filter_keeps_only_that_kind(
        raw in prop::collection::vec(arb_raw_message(), 0..60)
    ) {
        let conversations =
            build_conversations(materialize(raw), VIEWER, Some(MessageType::Order));
        for conv in &conversations {
            for msg in &conv.messages {
                prop_assert_eq!(msg.kind, MessageType::Order);
            }
        }
    }

    #[test]
    fn unread_sum_law_holds(
        raw in prop::collection::vec(arb_raw_message(), 0..60)
    ) {
        let messages = materialize(raw);
        let summary = crate::unread::count_unread(&messages, VIEWER);
        let sum: usize = summary.by_kind.values().sum();
        prop_assert_eq!(summary.all, sum);
    }
}
