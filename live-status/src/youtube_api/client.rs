//! HTTP client for the public (API-key authenticated) YouTube Data API v3 endpoints.

use crate::youtube_api::{
    search::SearchListResponse,
    videos::{LiveStreamingDetails, VideoListResponse},
};
use eyre::Context;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Base URL of the production YouTube Data API v3.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Page size the search API uses when `maxResults` is not given.
pub const DEFAULT_MAX_RESULTS: u32 = 5;

/// Client for the two read-only YouTube endpoints this service needs.
///
/// All calls authenticate with an API key passed as the `key` query parameter, so no
/// OAuth flow is involved. The underlying [`reqwest::Client`] is built with a per-request
/// timeout so that a hung upstream cannot stall a refresh cycle forever.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct YouTubeClient {
    api_key: Arc<str>,
    base_url: Arc<str>,
    /// Sent as the `origin` query parameter of search calls, for referrer-restricted keys.
    origin: Option<Arc<str>>,
    max_results: u32,
    client: reqwest::Client,
}

impl std::fmt::Debug for YouTubeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeClient")
            .field("base_url", &self.base_url)
            .field("origin", &self.origin)
            .field("max_results", &self.max_results)
            .finish_non_exhaustive()
    }
}

impl YouTubeClient {
    /// Creates a client talking to the production API with the given request timeout.
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> eyre::Result<Self> {
        let client = reqwest::ClientBuilder::new()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            api_key: Arc::from(api_key.into()),
            base_url: Arc::from(DEFAULT_BASE_URL),
            origin: None,
            max_results: DEFAULT_MAX_RESULTS,
            client,
        })
    }

    /// Points the client at a different API root, such as a local mock of the YouTube API.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = Arc::from(base_url.trim_end_matches('/'));
        self
    }

    pub fn with_origin(mut self, origin: Option<String>) -> Self {
        self.origin = origin.map(Arc::from);
        self
    }

    /// Sets how many search results are requested per refresh (1-50).
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results.clamp(1, 50);
        self
    }

    /// Sends a `GET` to `{base_url}/{endpoint}` and decodes the JSON body.
    ///
    /// Non-2xx responses become errors carrying the status and the response body. Transport
    /// errors are stripped of their URL because it carries the API key.
    #[instrument(skip(self, query_params), level = tracing::Level::TRACE)]
    async fn make_request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
    ) -> eyre::Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(query_params)
            .query(&[("key", &*self.api_key)])
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("send request to YouTube API: {}", url))?;

        let status_code = response.status();
        if !status_code.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(eyre::eyre!(
                "YouTube API request to {} failed with status {}: {}",
                endpoint,
                status_code,
                error_text
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("read YouTube {} response body", endpoint))?;
        tracing::trace!(endpoint, bytes = body.len(), "received YouTube API response");

        serde_json::from_slice(&body)
            .with_context(|| format!("parse YouTube {} API response as JSON", endpoint))
    }

    /// Lists the most recent videos of a channel, newest first.
    ///
    /// Uses the `search.list` API restricted to videos of `channel_id` and ordered by date.
    /// Upcoming and active live broadcasts are flagged through
    /// [`SearchResultSnippet::live_broadcast_content`](crate::youtube_api::search::SearchResultSnippet::live_broadcast_content).
    ///
    /// # API Cost
    ///
    /// This operation costs 100 quota units per call.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/search/list>
    #[instrument(skip(self))]
    pub async fn search_channel_videos(&self, channel_id: &str) -> eyre::Result<SearchListResponse> {
        let max_results = self.max_results.to_string();
        let mut query_params = vec![
            ("part", "snippet"),
            ("channelId", channel_id),
            ("channelType", "any"),
            ("order", "date"),
            ("type", "video"),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(origin) = self.origin.as_deref() {
            query_params.push(("origin", origin));
        }

        let results: SearchListResponse = self.make_request("search", &query_params).await?;

        tracing::debug!(
            channel_id,
            returned_items = results.items.len(),
            "fetched channel search results"
        );

        Ok(results)
    }

    /// Gets the live streaming details of a single video.
    ///
    /// Returns `Ok(None)` if the video is unknown or was never a live broadcast.
    ///
    /// # API Cost
    ///
    /// This operation costs 1 quota unit per call.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/videos/list>
    #[instrument(skip(self))]
    pub async fn get_live_streaming_details(
        &self,
        video_id: &str,
    ) -> eyre::Result<Option<LiveStreamingDetails>> {
        let query_params = [("part", "liveStreamingDetails"), ("id", video_id)];

        let videos: VideoListResponse = self.make_request("videos", &query_params).await?;

        tracing::debug!(
            video_id,
            returned_items = videos.items.len(),
            "fetched video live streaming details"
        );

        Ok(videos
            .items
            .into_iter()
            .next()
            .and_then(|video| video.live_streaming_details))
    }
}
