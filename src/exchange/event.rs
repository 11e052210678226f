//! Events a party can apply to an exchange

/// What one of the two parties asks the state machine to do. Either
/// party may fire any event; there is no mutual-consent handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeEvent {
    /// Agree to meet; carries an optional free-text note for the
    /// counterpart.
    ScheduleMeeting { comment: Option<String> },
    /// Turn the offer down, with an optional reason.
    Decline { reason: Option<String> },
    /// Silently archive the exchange. No notification is emitted.
    Archive,
}

impl ExchangeEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ExchangeEvent::ScheduleMeeting { .. } => "schedule-meeting",
            ExchangeEvent::Decline { .. } => "decline",
            ExchangeEvent::Archive => "archive",
        }
    }
}
