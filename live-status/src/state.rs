//! The single resolved record served to clients, and the slot that holds it.

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// Placeholder used for every field when nothing about the channel could be resolved.
pub const NONE: &str = "none";

/// `updated` value reported while the channel is live.
pub const STREAM_IS_LIVE: &str = "Stream is Live";

/// What the service currently knows about the channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedState {
    /// `live`, `upcoming` or `none`: the broadcast status of the chosen video.
    #[serde(rename = "livestreamStatus")]
    pub livestream_status: String,
    #[serde(rename = "videoId")]
    pub video_id: String,
    /// [`STREAM_IS_LIVE`], the end time of the last broadcast, a publish time, or `none`.
    pub updated: String,
    /// When the resolution completed.
    pub fetched_at: Timestamp,
}

impl ResolvedState {
    /// The sentinel state: nothing resolvable.
    pub fn none(fetched_at: Timestamp) -> Self {
        Self {
            livestream_status: NONE.to_string(),
            video_id: NONE.to_string(),
            updated: NONE.to_string(),
            fetched_at,
        }
    }

    pub fn live(video_id: String, livestream_status: String, fetched_at: Timestamp) -> Self {
        Self {
            livestream_status,
            video_id,
            updated: STREAM_IS_LIVE.to_string(),
            fetched_at,
        }
    }

    pub fn most_recent(
        video_id: String,
        livestream_status: String,
        updated: String,
        fetched_at: Timestamp,
    ) -> Self {
        Self {
            livestream_status,
            video_id,
            updated,
            fetched_at,
        }
    }

    /// Whether this is the sentinel state.
    pub fn is_none(&self) -> bool {
        self.video_id == NONE
    }
}

/// Shared single-slot store for the [`ResolvedState`].
///
/// Backed by a [`watch`] channel: the record is always replaced as a whole, so a reader sees
/// either the previous record or the next one, never a mix. Reads never wait on the network;
/// they only contend for the short moment a commit swaps the value.
///
/// Clones are handles to the same slot.
#[derive(Debug, Clone)]
pub struct StateStore {
    tx: Arc<watch::Sender<ResolvedState>>,
}

impl StateStore {
    pub fn new(initial: ResolvedState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// A copy of the current record.
    pub fn snapshot(&self) -> ResolvedState {
        self.tx.borrow().clone()
    }

    /// The current record as the JSON body served to clients.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        let current = self.tx.borrow();
        serde_json::to_vec(&*current)
    }

    /// Replaces the current record with `next`.
    ///
    /// `fetched_at` strictly increases across commits: if the clock has not advanced past the
    /// previous record, the new record is stamped one nanosecond after it.
    pub fn commit(&self, mut next: ResolvedState) -> ResolvedState {
        self.tx.send_modify(|current| {
            if next.fetched_at <= current.fetched_at {
                tracing::trace!(
                    previous = %current.fetched_at,
                    next = %next.fetched_at,
                    "clock did not advance between commits"
                );
                next.fetched_at = current
                    .fetched_at
                    .checked_add(SignedDuration::from_nanos(1))
                    .unwrap_or(current.fetched_at);
            }
            *current = next.clone();
        });
        next
    }

    /// Receives a notification every time a new record is committed.
    pub fn subscribe(&self) -> watch::Receiver<ResolvedState> {
        self.tx.subscribe()
    }
}
