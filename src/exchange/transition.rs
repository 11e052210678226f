//! Pure state transition function
//!
//! Given the same status and event this always produces the same
//! outcome, with no I/O. Statuses only move forward:
//!
//! ```text
//! created -> ok_meeting -> finished
//! created -> reject
//! created -> finished
//! ```
//!
//! `reject` and `finished` accept nothing further.

use super::event::ExchangeEvent;
use crate::model::ExchangeStatus;
use thiserror::Error;

/// Notification the transition asks the caller to emit to the
/// counterpart. Composition of the actual text lives in
/// [`super::compose`]; archival produces no notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    MeetingScheduled { comment: Option<String> },
    Declined { reason: Option<String> },
}

/// Result of an accepted transition.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub new_status: ExchangeStatus,
    pub notice: Option<Notice>,
}

/// Errors for rejected transitions. The exchange is never mutated when
/// one of these comes back.
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("exchange is closed in status '{0}', no further transitions")]
    Closed(ExchangeStatus),
    #[error("event '{event}' is not valid from status '{from}'")]
    Invalid {
        from: ExchangeStatus,
        event: &'static str,
    },
}

/// Applies `event` to `status`, deciding the new status and whether the
/// counterpart must be notified.
pub fn transition(
    status: ExchangeStatus,
    event: ExchangeEvent,
) -> Result<TransitionOutcome, TransitionError> {
    if status.is_closed() {
        return Err(TransitionError::Closed(status));
    }

    match (status, event) {
        (ExchangeStatus::Created, ExchangeEvent::ScheduleMeeting { comment }) => {
            Ok(TransitionOutcome {
                new_status: ExchangeStatus::OkMeeting,
                notice: Some(Notice::MeetingScheduled { comment }),
            })
        }

        (ExchangeStatus::Created, ExchangeEvent::Decline { reason }) => Ok(TransitionOutcome {
            new_status: ExchangeStatus::Reject,
            notice: Some(Notice::Declined { reason }),
        }),

        (ExchangeStatus::Created | ExchangeStatus::OkMeeting, ExchangeEvent::Archive) => {
            Ok(TransitionOutcome {
                new_status: ExchangeStatus::Finished,
                notice: None,
            })
        }

        (from, event) => Err(TransitionError::Invalid {
            from,
            event: event.name(),
        }),
    }
}
