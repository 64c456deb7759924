//! Bridges the in-process event bus onto WebSocket sessions.

mod router;

pub use router::RealtimeRouter;
