//! Live unread-message counter.
//!
//! [`UnreadCounter`] maintains per-user unread totals in memory by
//! consuming the event bus. The database stays the source of truth: a cache
//! entry only exists after a [`resync`](UnreadCounter::resync), and any gap
//! in the event stream evicts the cache so the next read recounts.
//!
//! Writers and recounts coordinate through a per-user gate. A handler that
//! stores a message or flips reads holds the gate across the commit and
//! stamps the published event with the user's next sequence number
//! ([`UnreadWriter::stamp`]); a recount holds the same gate and records the
//! latest stamped sequence alongside the cached total. The consumer ignores
//! events at or below that mark, so a row the recount already saw is never
//! folded in a second time.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast::error::RecvError, Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, info, warn};
use tutorlink_core::types::DbId;
use tutorlink_db::repositories::MessageRepo;
use tutorlink_db::DbPool;

use crate::bus::{EventBus, RealtimeEvent};

/// A cached total plus the latest sequence the establishing recount covered.
#[derive(Debug, Clone, Copy)]
struct CachedCount {
    count: i64,
    synced_seq: u64,
}

/// Per-user coordination state: the gate serializes store writes against
/// recounts, the sequence orders published events relative to recounts.
#[derive(Default)]
struct UserSync {
    gate: Arc<Mutex<()>>,
    seq: AtomicU64,
}

/// Exclusive write scope for one user's unread state.
///
/// Held by a handler from before the store write until after the matching
/// event is published. While it is held no recount for the same user can
/// run, so a recount either sees the committed row and a sequence covering
/// its event, or sees neither.
pub struct UnreadWriter {
    sync: Arc<UserSync>,
    _gate: OwnedMutexGuard<()>,
}

impl UnreadWriter {
    /// Sequence number for the event about to be published.
    pub fn stamp(&self) -> u64 {
        self.sync.seq.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// In-memory per-user unread totals.
///
/// Shared via `Arc<UnreadCounter>` between the consumer task and the HTTP
/// handlers. Counts never go negative; a read that flips more messages than
/// the cached total clamps to zero.
#[derive(Default)]
pub struct UnreadCounter {
    counts: RwLock<HashMap<DbId, CachedCount>>,
    sync: Mutex<HashMap<DbId, Arc<UserSync>>>,
}

impl UnreadCounter {
    pub fn new() -> Self {
        Self::default()
    }

    async fn user_sync(&self, user_id: DbId) -> Arc<UserSync> {
        Arc::clone(self.sync.lock().await.entry(user_id).or_default())
    }

    /// Open a write scope for a user.
    ///
    /// Callers hold the returned [`UnreadWriter`] across the store write and
    /// the publish of the resulting event, stamping the event with
    /// [`UnreadWriter::stamp`].
    pub async fn writer(&self, user_id: DbId) -> UnreadWriter {
        let sync = self.user_sync(user_id).await;
        let gate = Arc::clone(&sync.gate).lock_owned().await;
        UnreadWriter { sync, _gate: gate }
    }

    /// The cached unread total for a user, if one has been established.
    pub async fn get(&self, user_id: DbId) -> Option<i64> {
        self.counts.read().await.get(&user_id).map(|cached| cached.count)
    }

    /// Recount from the store and cache the result.
    pub async fn resync(&self, pool: &DbPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let sync = self.user_sync(user_id).await;
        let _gate = Arc::clone(&sync.gate).lock_owned().await;
        let count = MessageRepo::unread_count(pool, user_id).await?;
        self.install(&sync, user_id, count).await;
        Ok(count)
    }

    /// Cache a recounted total together with the latest stamped sequence.
    ///
    /// The caller holds the user's gate: every row the recount saw has
    /// already been stamped, and anything stamped later was committed after
    /// the recount ran.
    async fn install(&self, sync: &UserSync, user_id: DbId, count: i64) {
        let synced_seq = sync.seq.load(Ordering::SeqCst);
        self.counts
            .write()
            .await
            .insert(user_id, CachedCount { count, synced_seq });
    }

    /// Apply a stamped delta to a user's cached total, clamping at zero.
    ///
    /// No-op for users without an established cache entry (their next read
    /// resyncs from the store) and for events the establishing recount
    /// already covered.
    async fn apply(&self, user_id: DbId, seq: u64, delta: i64) {
        let mut counts = self.counts.write().await;
        if let Some(cached) = counts.get_mut(&user_id) {
            if seq > cached.synced_seq {
                cached.count = (cached.count + delta).max(0);
            }
        }
    }

    /// Drop all cached totals, forcing recounts on next read.
    async fn clear(&self) {
        self.counts.write().await.clear();
    }

    /// Fold a single event into the cache.
    async fn handle(&self, event: &RealtimeEvent) {
        match event {
            RealtimeEvent::MessageCreated { message, seq } => {
                self.apply(message.receiver_id, *seq, 1).await;
            }
            RealtimeEvent::MessagesRead {
                reader_id,
                flipped,
                seq,
                ..
            } => {
                self.apply(*reader_id, *seq, -(*flipped as i64)).await;
            }
            RealtimeEvent::NotificationCreated { .. } => {}
        }
    }

    /// Consume the bus until it closes.
    ///
    /// Spawned once at startup; exits when the last `EventBus` handle is
    /// dropped during shutdown.
    pub async fn run(self: Arc<Self>, bus: Arc<EventBus>) {
        let mut rx = bus.subscribe();
        info!("Unread counter started");
        loop {
            match rx.recv().await {
                Ok(event) => self.handle(&event).await,
                Err(RecvError::Lagged(skipped)) => {
                    // Missed events mean unknown deltas; evict everything
                    // rather than serve stale totals.
                    warn!(skipped, "Unread counter lagged, dropping cache");
                    self.clear().await;
                }
                Err(RecvError::Closed) => {
                    debug!("Event bus closed, unread counter stopping");
                    break;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
