//! Real-time event plumbing: the in-process broadcast bus and the live
//! unread-message counter that consumes it.

pub mod bus;
pub mod unread;

pub use bus::{EventBus, RealtimeEvent};
pub use unread::{UnreadCounter, UnreadWriter};
