use crate::enricher;
use crate::provider::{DetailProvider, SearchProvider};
use crate::resolver::{self, Resolution};
use crate::state::{ResolvedState, StateStore};
use jiff::Timestamp;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};

/// Longest accepted pause between refresh cycles, one day.
pub const MAX_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Runs refresh cycles for one channel and commits each outcome to the [`StateStore`].
///
/// A cycle is: list the channel's videos, resolve, look up the end time if the chosen video
/// is not live, commit. Upstream failures never escape a cycle; they turn into the sentinel
/// state or the publish-time fallback.
#[derive(Debug)]
pub struct Refresher<S, D> {
    search: S,
    details: D,
    channel_id: String,
    store: StateStore,
}

impl<S, D> Refresher<S, D>
where
    S: SearchProvider + 'static,
    D: DetailProvider + 'static,
{
    pub fn new(search: S, details: D, channel_id: impl Into<String>, store: StateStore) -> Self {
        Self {
            search,
            details,
            channel_id: channel_id.into(),
            store,
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Computes the state for one cycle without committing it.
    pub async fn resolve_once(&self) -> ResolvedState {
        let items = match self.search.list_recent_videos(&self.channel_id).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(
                    channel = %self.channel_id,
                    error = %format!("{e:#}"),
                    "failed to list channel videos, reporting none"
                );
                return ResolvedState::none(Timestamp::now());
            }
        };

        match resolver::resolve(&items) {
            Resolution::Live {
                video_id,
                broadcast_status,
            } => ResolvedState::live(video_id, broadcast_status.to_string(), Timestamp::now()),
            Resolution::MostRecent {
                video_id,
                broadcast_status,
                published_at,
            } => {
                let updated =
                    enricher::end_time_or_published(&self.details, &video_id, &published_at).await;
                ResolvedState::most_recent(
                    video_id,
                    broadcast_status.to_string(),
                    updated,
                    Timestamp::now(),
                )
            }
            Resolution::None => {
                tracing::debug!(
                    channel = %self.channel_id,
                    listed = items.len(),
                    "no usable videos in listing"
                );
                ResolvedState::none(Timestamp::now())
            }
        }
    }

    /// Runs one full cycle and commits its outcome, returning what was committed.
    pub async fn refresh_once(&self) -> ResolvedState {
        let next = self.resolve_once().await;
        let committed = self.store.commit(next);
        tracing::info!(
            channel = %self.channel_id,
            status = %committed.livestream_status,
            video_id = %committed.video_id,
            updated = %committed.updated,
            fetched_at = %committed.fetched_at,
            "refreshed channel state"
        );
        committed
    }

    /// Spawns the recurring refresh task.
    ///
    /// The first cycle runs one full `interval` after spawning, since the startup cycle has
    /// already run. A slow cycle delays the next tick rather than causing a burst, so cycles
    /// never overlap. Intervals above [`MAX_REFRESH_INTERVAL`] are clamped to it. The task
    /// returns once `shutdown` turns `true`.
    pub fn spawn(
        self,
        interval: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> tokio::task::JoinHandle<()> {
        let interval = interval.min(MAX_REFRESH_INTERVAL);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.refresh_once().await;
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            tracing::debug!(channel = %self.channel_id, "refresher shutting down");
                            break;
                        }
                    }
                }
            }
        })
    }
}
