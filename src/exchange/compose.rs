//! Notification text composition
//!
//! Pure formatting of the messages a transition (or a fresh offer)
//! sends to the counterpart. Kept apart from the transition rules so
//! the wording and item formatting are testable on their own.

use super::transition::Notice;
use crate::catalog::{format_items, Catalog};
use crate::model::Exchange;

/// Text of the message announcing a brand-new offer to the provider.
pub fn compose_offer(exchange: &Exchange, catalog: &Catalog) -> String {
    let mut body = format!(
        "Новое предложение обмена.\nВам предлагают: {}\nВзамен просят: {}",
        format_items(&exchange.buyer_items, catalog),
        format_items(&exchange.provider_items, catalog),
    );
    if let Some(comment) = &exchange.comment {
        if !comment.is_empty() {
            body.push_str("\nКомментарий: ");
            body.push_str(comment);
        }
    }
    body
}

/// Text of the message a transition emits to the party that did not
/// perform it. Restates both item lists so the notification reads on
/// its own.
pub fn compose_notice(exchange: &Exchange, notice: &Notice, catalog: &Catalog) -> String {
    let buyer = format_items(&exchange.buyer_items, catalog);
    let provider = format_items(&exchange.provider_items, catalog);

    match notice {
        Notice::MeetingScheduled { comment } => {
            let mut body = format!(
                "Встреча по обмену согласована.\nПредложение: {buyer}\nВзамен: {provider}"
            );
            if let Some(comment) = comment {
                if !comment.is_empty() {
                    body.push_str("\nКомментарий: ");
                    body.push_str(comment);
                }
            }
            body
        }
        Notice::Declined { reason } => {
            let mut body =
                format!("Обмен отклонён.\nПредложение: {buyer}\nВзамен: {provider}");
            if let Some(reason) = reason {
                if !reason.is_empty() {
                    body.push_str("\nПричина: ");
                    body.push_str(reason);
                }
            }
            body
        }
    }
}
