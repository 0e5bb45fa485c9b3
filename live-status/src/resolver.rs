//! Decides what a channel listing says about the channel right now.
//!
//! This is pure logic: it never performs I/O and always produces exactly one [`Resolution`].

use crate::youtube_api::LiveBroadcastContent;

/// One video of a channel listing, in the order the search provider ranked it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEntry {
    pub broadcast_status: LiveBroadcastContent,
    pub video_id: String,
    /// Publish time as sent upstream. `None` or empty means the entry has no usable time.
    pub published_at: Option<String>,
}

impl VideoEntry {
    fn usable_published_at(&self) -> Option<&str> {
        self.published_at.as_deref().filter(|t| !t.is_empty())
    }
}

/// The outcome of resolving one listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The channel is broadcasting this video right now.
    Live {
        video_id: String,
        broadcast_status: LiveBroadcastContent,
    },
    /// Nothing is live; this is the newest video with a publish time.
    MostRecent {
        video_id: String,
        broadcast_status: LiveBroadcastContent,
        published_at: String,
    },
    /// The listing was empty or no entry carried a publish time.
    None,
}

/// Picks the entry that best describes the channel.
///
/// The first live entry in listing order wins outright, regardless of timestamps. Otherwise
/// the entry with the greatest `published_at` is chosen, comparing the strings
/// lexicographically; ties keep the earlier entry. Entries without a publish time are ignored.
pub fn resolve(items: &[VideoEntry]) -> Resolution {
    if let Some(live) = items
        .iter()
        .find(|entry| entry.broadcast_status == LiveBroadcastContent::Live)
    {
        return Resolution::Live {
            video_id: live.video_id.clone(),
            broadcast_status: live.broadcast_status,
        };
    }

    let mut newest: Option<(&VideoEntry, &str)> = None;
    for entry in items {
        let Some(published_at) = entry.usable_published_at() else {
            continue;
        };
        // upstream sends fixed-width UTC ISO 8601, so string order is time order
        match newest {
            Some((_, best)) if published_at <= best => {}
            _ => newest = Some((entry, published_at)),
        }
    }

    match newest {
        Some((entry, published_at)) => Resolution::MostRecent {
            video_id: entry.video_id.clone(),
            broadcast_status: entry.broadcast_status,
            published_at: published_at.to_string(),
        },
        None => Resolution::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(status: LiveBroadcastContent, id: &str, published_at: Option<&str>) -> VideoEntry {
        VideoEntry {
            broadcast_status: status,
            video_id: id.to_string(),
            published_at: published_at.map(str::to_string),
        }
    }

    use LiveBroadcastContent::{Live, None as NotLive, Upcoming};

    #[test]
    fn test_live_entry_wins_over_newer_videos() {
        let items = [
            entry(NotLive, "abc", Some("2024-01-01T00:00:00Z")),
            entry(Live, "xyz", Some("2024-01-02T00:00:00Z")),
            entry(NotLive, "newer", Some("2024-02-01T00:00:00Z")),
        ];
        assert_eq!(
            resolve(&items),
            Resolution::Live {
                video_id: "xyz".into(),
                broadcast_status: Live,
            }
        );
    }

    #[test]
    fn test_first_live_entry_in_listing_order_wins() {
        let items = [
            entry(Live, "first", Some("2024-01-01T00:00:00Z")),
            entry(Live, "second", Some("2024-03-01T00:00:00Z")),
        ];
        assert_eq!(
            resolve(&items),
            Resolution::Live {
                video_id: "first".into(),
                broadcast_status: Live,
            }
        );
    }

    #[test]
    fn test_live_entry_without_publish_time_still_wins() {
        let items = [
            entry(NotLive, "a", Some("2024-01-01T00:00:00Z")),
            entry(Live, "b", None),
        ];
        assert!(matches!(resolve(&items), Resolution::Live { video_id, .. } if video_id == "b"));
    }

    #[test]
    fn test_most_recent_by_published_at() {
        let items = [
            entry(NotLive, "a", Some("2024-01-01T00:00:00Z")),
            entry(NotLive, "b", Some("2024-01-03T00:00:00Z")),
            entry(Upcoming, "c", Some("2024-01-02T00:00:00Z")),
        ];
        assert_eq!(
            resolve(&items),
            Resolution::MostRecent {
                video_id: "b".into(),
                broadcast_status: NotLive,
                published_at: "2024-01-03T00:00:00Z".into(),
            }
        );
    }

    #[test]
    fn test_upcoming_keeps_its_status() {
        let items = [
            entry(NotLive, "a", Some("2024-01-01T00:00:00Z")),
            entry(Upcoming, "soon", Some("2024-05-01T00:00:00Z")),
        ];
        assert_eq!(
            resolve(&items),
            Resolution::MostRecent {
                video_id: "soon".into(),
                broadcast_status: Upcoming,
                published_at: "2024-05-01T00:00:00Z".into(),
            }
        );
    }

    #[test]
    fn test_ties_keep_earliest_seen() {
        let items = [
            entry(NotLive, "first", Some("2024-01-03T00:00:00Z")),
            entry(NotLive, "second", Some("2024-01-03T00:00:00Z")),
        ];
        assert!(
            matches!(resolve(&items), Resolution::MostRecent { video_id, .. } if video_id == "first")
        );
    }

    #[test]
    fn test_entries_without_publish_time_are_ignored() {
        let items = [
            entry(NotLive, "missing", None),
            entry(NotLive, "empty", Some("")),
            entry(NotLive, "old", Some("2023-06-01T00:00:00Z")),
        ];
        assert_eq!(
            resolve(&items),
            Resolution::MostRecent {
                video_id: "old".into(),
                broadcast_status: NotLive,
                published_at: "2023-06-01T00:00:00Z".into(),
            }
        );
    }

    #[test]
    fn test_empty_listing_resolves_to_none() {
        assert_eq!(resolve(&[]), Resolution::None);
    }

    #[test]
    fn test_no_usable_publish_time_resolves_to_none() {
        let items = [entry(NotLive, "a", None), entry(Upcoming, "b", Some(""))];
        assert_eq!(resolve(&items), Resolution::None);
    }
}
