//! Thread builder
//!
//! Reconstructs threaded conversations from a participant's flat,
//! unordered message set: one conversation per counterpart, and within
//! each conversation the reply chains implied by `reply_to` links.
//!
//! Everything here is a pure function over a snapshot of the message
//! list. It is recomputed on every read; nothing is cached or persisted.

#[cfg(test)]
mod proptests;

use crate::model::{Message, MessageType};
use std::collections::{HashMap, HashSet};

/// One reply tree, flattened chronologically. Always holds at least one
/// message (its root).
#[derive(Debug, Clone)]
pub struct Chain {
    pub messages: Vec<Message>,
}

impl Chain {
    /// The chain root, i.e. its oldest message.
    pub fn root(&self) -> &Message {
        &self.messages[0]
    }

    /// The most recent message, used to order chains within a
    /// conversation.
    pub fn last(&self) -> &Message {
        &self.messages[self.messages.len() - 1]
    }
}

/// All traffic between the viewer and one counterpart.
///
/// `messages` is the full chronological list; `chains` partitions the
/// same set into reply trees, most recently active first.
#[derive(Debug, Clone)]
pub struct Conversation {
    pub counterpart: String,
    pub messages: Vec<Message>,
    pub chains: Vec<Chain>,
    pub latest: Message,
}

/// Builds the conversation view for `me` from a flat message set.
///
/// Tombstoned messages are dropped first; `filter` keeps only one kind
/// (`None` is the "all" filter). Conversations come back ordered by the
/// recency of their latest message, newest first.
pub fn build_conversations(
    messages: Vec<Message>,
    me: &str,
    filter: Option<MessageType>,
) -> Vec<Conversation> {
    let mut groups: HashMap<String, Vec<Message>> = HashMap::new();
    for msg in messages {
        if msg.is_tombstoned() {
            continue;
        }
        if let Some(kind) = filter {
            if msg.kind != kind {
                continue;
            }
        }
        let counterpart = msg.counterpart(me).to_string();
        groups.entry(counterpart).or_default().push(msg);
    }

    let mut conversations: Vec<Conversation> = groups
        .into_iter()
        .map(|(counterpart, mut group)| {
            group.sort_by_key(Message::sort_key);
            let chains = build_chains(&group);
            // Canonical order means the group's last element is the
            // conversation-wide latest message.
            let latest = group[group.len() - 1].clone();
            Conversation {
                counterpart,
                messages: group,
                chains,
                latest,
            }
        })
        .collect();

    conversations.sort_by_key(|c| std::cmp::Reverse(c.latest.sort_key()));
    conversations
}

/// Reconstructs reply chains within one chronologically sorted group.
///
/// A message is a root when `reply_to` is absent or does not resolve to
/// another message in this group (a reply to a filtered-out or foreign
/// message is promoted to root). Each root claims its transitive replies
/// through an explicit worklist; the claimed set guarantees every
/// message lands in exactly one chain and that traversal terminates even
/// when malformed data introduces a `reply_to` cycle.
fn build_chains(group: &[Message]) -> Vec<Chain> {
    let ids: HashSet<i64> = group.iter().map(|m| m.id).collect();

    // Children indexed by parent id, already in chronological order
    // because the group is.
    let mut children: HashMap<i64, Vec<usize>> = HashMap::new();
    for (idx, msg) in group.iter().enumerate() {
        if let Some(parent) = msg.reply_to {
            if parent != msg.id && ids.contains(&parent) {
                children.entry(parent).or_default().push(idx);
            }
        }
    }

    let is_root = |msg: &Message| match msg.reply_to {
        None => true,
        // Self-replies count as roots too; they resolve nowhere useful.
        Some(parent) => parent == msg.id || !ids.contains(&parent),
    };

    let mut claimed: HashSet<i64> = HashSet::new();
    let mut chains: Vec<Chain> = Vec::new();

    for (root_idx, root) in group.iter().enumerate() {
        if !is_root(root) || claimed.contains(&root.id) {
            continue;
        }
        let mut member_idxs: Vec<usize> = Vec::new();
        let mut stack: Vec<usize> = vec![root_idx];
        while let Some(idx) = stack.pop() {
            let msg = &group[idx];
            if !claimed.insert(msg.id) {
                continue;
            }
            member_idxs.push(idx);
            if let Some(kids) = children.get(&msg.id) {
                stack.extend(kids.iter().copied());
            }
        }
        chains.push(finish_chain(group, member_idxs));
    }

    // Defensive: anything never reached from a root (its parent chain
    // was never rooted, or the data holds a reply cycle) becomes its own
    // singleton chain rather than vanishing.
    for (idx, msg) in group.iter().enumerate() {
        if claimed.insert(msg.id) {
            chains.push(finish_chain(group, vec![idx]));
        }
    }

    chains.sort_by_key(|chain| std::cmp::Reverse(chain.last().sort_key()));
    chains
}

fn finish_chain(group: &[Message], mut member_idxs: Vec<usize>) -> Chain {
    // Group indices are chronological, so index order is message order.
    member_idxs.sort_unstable();
    Chain {
        messages: member_idxs.iter().map(|&i| group[i].clone()).collect(),
    }
}

/// Splits a message body into its text and any inline image URLs,
/// written markdown-style as `![alt](url)`. Pure string processing; the
/// URLs are not fetched or validated.
pub fn extract_images(body: &str) -> (String, Vec<String>) {
    let mut text = String::new();
    let mut images = Vec::new();
    let mut rest = body;

    while let Some(start) = rest.find("![") {
        let Some(tail) = rest.get(start..) else { break };
        let Some(mid) = tail.find("](") else { break };
        let Some(after_mid) = tail.get(mid + 2..) else { break };
        let Some(close) = after_mid.find(')') else { break };

        if let Some(head) = rest.get(..start) {
            text.push_str(head);
        }
        if let Some(url) = after_mid.get(..close) {
            if !url.is_empty() {
                images.push(url.to_string());
            }
        }
        rest = after_mid.get(close + 1..).unwrap_or_default();
    }
    text.push_str(rest);
    (text.trim().to_string(), images)
}
