//! Exchange negotiation state machine
//!
//! Pure transition rules for barter offers, separated from the
//! composition of the notification text a transition emits. The service
//! layer executes the resulting effects against the stores.

mod compose;
mod event;
mod transition;

pub use compose::{compose_notice, compose_offer};
pub use event::ExchangeEvent;
pub use transition::{transition, Notice, TransitionError, TransitionOutcome};
