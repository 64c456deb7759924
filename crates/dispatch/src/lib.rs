//! Notification fan-out: matching a requirement against the tutor pool and
//! delivering per-tutor notifications with bounded concurrency and retries.

pub mod dispatcher;
pub mod retry;

pub use dispatcher::{DispatchReport, Dispatcher};
