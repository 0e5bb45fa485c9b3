//! YouTube Search API types.

use crate::resolver::VideoEntry;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Response structure for the `search.list` API call.
///
/// Only the fields this service reads are declared. A response without an
/// `items` array decodes as an empty listing.
///
/// See: <https://developers.google.com/youtube/v3/docs/search/list>
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchListResponse {
    /// A list of results that match the search criteria, ordered as requested.
    #[serde(default)]
    pub items: Vec<SearchResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_info: Option<PageInfo>,
    /// Token that can be used as the value of the pageToken parameter to retrieve the next page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Paging details for lists of resources.
///
/// See: <https://developers.google.com/youtube/v3/docs/pageInfo>
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// The total number of results in the result set.
    #[serde(default)]
    pub total_results: u32,
    /// The number of results included in the API response.
    #[serde(default)]
    pub results_per_page: u32,
}

/// A single search hit.
///
/// See: <https://developers.google.com/youtube/v3/docs/search#resource>
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub id: SearchResultId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<SearchResultSnippet>,
}

/// Identifies the resource a search hit refers to.
///
/// Only `videoId` is of interest, and it is only present when the hit is a video.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultId {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
}

/// Basic details about a search hit.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultSnippet {
    /// The creation date of the resource.
    ///
    /// Kept as the exact string the API sent (ISO 8601, UTC) so it can be compared
    /// and echoed back without reformatting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Whether the resource is an upcoming or active live broadcast.
    #[serde(default, deserialize_with = "null_as_default")]
    pub live_broadcast_content: LiveBroadcastContent,
}

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Indicates if a video is an upcoming or active live broadcast.
///
/// See: <https://developers.google.com/youtube/v3/docs/search#snippet.liveBroadcastContent>
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiveBroadcastContent {
    /// The video is an active live broadcast.
    Live,
    /// The video is an upcoming live broadcast.
    Upcoming,
    /// The video is not an upcoming/active live broadcast.
    #[default]
    None,
}

impl LiveBroadcastContent {
    pub fn as_str(&self) -> &'static str {
        match self {
            LiveBroadcastContent::Live => "live",
            LiveBroadcastContent::Upcoming => "upcoming",
            LiveBroadcastContent::None => "none",
        }
    }
}

impl fmt::Display for LiveBroadcastContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SearchResult {
    /// Converts this hit into the entry the resolver works on.
    ///
    /// Returns `None` for hits that cannot name a video (no `id.videoId`) or carry no snippet.
    pub fn to_entry(&self) -> Option<VideoEntry> {
        let video_id = self.id.video_id.as_deref().filter(|id| !id.is_empty())?;
        let snippet = self.snippet.as_ref()?;
        Some(VideoEntry {
            broadcast_status: snippet.live_broadcast_content,
            video_id: video_id.to_string(),
            published_at: snippet.published_at.clone(),
        })
    }
}

impl SearchListResponse {
    /// All usable entries, in the order the API returned them.
    pub fn entries(&self) -> Vec<VideoEntry> {
        self.items
            .iter()
            .filter_map(|item| {
                let entry = item.to_entry();
                if entry.is_none() {
                    tracing::debug!(
                        kind = ?item.id.kind,
                        has_snippet = item.snippet.is_some(),
                        "dropping search result that does not describe a video"
                    );
                }
                entry
            })
            .collect()
    }
}
