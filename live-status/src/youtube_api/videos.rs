//! YouTube Videos API types.

use serde::{Deserialize, Serialize};

/// Response structure for the `videos.list` API call.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos/list>
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VideoListResponse {
    /// A list of videos that match the request criteria.
    #[serde(default)]
    pub items: Vec<Video>,
}

/// A `video` resource represents a YouTube video.
///
/// Only the live streaming details are requested by this service.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#resource>
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// The ID that YouTube uses to uniquely identify the video.
    #[serde(default)]
    pub id: String,
    /// Only present if the video is an upcoming, live, or completed live broadcast.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_streaming_details: Option<LiveStreamingDetails>,
}

/// Metadata which is only available for live broadcast videos.
///
/// Times are kept as the strings the API sent.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#liveStreamingDetails>
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStreamingDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_start_time: Option<String>,
    /// The time that the broadcast actually ended.
    ///
    /// Not present until the broadcast is over.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_end_time: Option<String>,
    /// The number of viewers currently watching the broadcast, as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrent_viewers: Option<String>,
}

impl LiveStreamingDetails {
    /// The end time, unless the API left it out or sent an empty string.
    pub fn end_time(&self) -> Option<&str> {
        self.actual_end_time.as_deref().filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_video_list_deserialization() {
        let json = r#"
        {
            "kind": "youtube#videoListResponse",
            "items": [
                {
                    "kind": "youtube#video",
                    "id": "b",
                    "liveStreamingDetails": {
                        "actualStartTime": "2024-01-03T00:00:05Z",
                        "actualEndTime": "2024-01-03T02:00:00Z",
                        "scheduledStartTime": "2024-01-03T00:00:00Z"
                    }
                }
            ],
            "pageInfo": {"totalResults": 1, "resultsPerPage": 1}
        }"#;

        let parsed: VideoListResponse = serde_json::from_str(json).unwrap();
        let details = parsed.items[0].live_streaming_details.as_ref().unwrap();
        assert_eq!(details.end_time(), Some("2024-01-03T02:00:00Z"));
    }

    #[test]
    fn test_regular_video_has_no_details() {
        let parsed: VideoListResponse =
            serde_json::from_str(r#"{"items": [{"id": "plain"}]}"#).unwrap();
        assert_eq!(parsed.items[0].live_streaming_details, None);
    }

    #[test]
    fn test_empty_end_time_is_treated_as_missing() {
        let details = LiveStreamingDetails {
            actual_end_time: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(details.end_time(), None);
    }
}
