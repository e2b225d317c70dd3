//! The conversation layer: inbound events from any chat transport,
//! outbound replies, and the state machine between them.
//!
//! The transport (webhook, long polling, a test harness) is expected to
//! map its own update type onto [`Event`], call the controller, and
//! render the returned [`Reply`] values. Nothing in here knows how to
//! talk to a chat API.

mod controller;
mod events;

pub use controller::ConversationController;
pub use events::{Action, Event, Reply, MAX_FILE_SIZE, OPACITY_CHOICES};
