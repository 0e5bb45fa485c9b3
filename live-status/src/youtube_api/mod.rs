//! YouTube Data API v3 client library.
//!
//! Covers the two read-only endpoints needed to tell whether a channel is live:
//!
//! - `search.list`, restricted to one channel's videos ordered by date, which flags each hit
//!   as `live`, `upcoming` or `none` through [`search::LiveBroadcastContent`].
//! - `videos.list` with `part=liveStreamingDetails`, which reports when a past broadcast
//!   actually ended.
//!
//! Both are called with a plain API key; no OAuth is involved.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use yt_live_status::youtube_api::YouTubeClient;
//!
//! # async fn example() -> eyre::Result<()> {
//! let client = YouTubeClient::new("my-api-key", Duration::from_secs(10))?;
//! let results = client.search_channel_videos("UC1234").await?;
//! for entry in results.entries() {
//!     println!("{} ({})", entry.video_id, entry.broadcast_status);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod search;
pub mod videos;

pub use client::YouTubeClient;
pub use search::{LiveBroadcastContent, SearchListResponse, SearchResult, SearchResultSnippet};
pub use videos::{LiveStreamingDetails, Video, VideoListResponse};
