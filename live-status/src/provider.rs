//! The two upstream collaborators a refresh cycle talks to.
//!
//! [`YouTubeClient`] implements both against the real API. Tests substitute in-memory fakes.

use crate::resolver::VideoEntry;
use crate::youtube_api::YouTubeClient;
use std::future::Future;

/// Lists a channel's recent videos, ranked by the provider.
pub trait SearchProvider: Send + Sync {
    fn list_recent_videos(
        &self,
        channel_id: &str,
    ) -> impl Future<Output = eyre::Result<Vec<VideoEntry>>> + Send;
}

/// Looks up when a past live broadcast actually ended.
pub trait DetailProvider: Send + Sync {
    /// `Ok(None)` when the video is unknown, was never live, or has not ended yet.
    fn actual_end_time(
        &self,
        video_id: &str,
    ) -> impl Future<Output = eyre::Result<Option<String>>> + Send;
}

impl SearchProvider for YouTubeClient {
    async fn list_recent_videos(&self, channel_id: &str) -> eyre::Result<Vec<VideoEntry>> {
        let results = self.search_channel_videos(channel_id).await?;
        Ok(results.entries())
    }
}

impl DetailProvider for YouTubeClient {
    async fn actual_end_time(&self, video_id: &str) -> eyre::Result<Option<String>> {
        let details = self.get_live_streaming_details(video_id).await?;
        Ok(details.and_then(|d| d.end_time().map(str::to_string)))
    }
}
