use crate::provider::DetailProvider;

/// Produces the `updated` value for a video that is not live.
///
/// Prefers the broadcast's actual end time. When the lookup fails or yields nothing, the
/// video's own publish time is returned unchanged. Never fails.
pub async fn end_time_or_published<D: DetailProvider>(
    details: &D,
    video_id: &str,
    published_at: &str,
) -> String {
    match details.actual_end_time(video_id).await {
        Ok(Some(end_time)) if !end_time.is_empty() => end_time,
        Ok(_) => {
            tracing::debug!(video_id, "no end time reported, using publish time");
            published_at.to_string()
        }
        Err(e) => {
            tracing::warn!(
                video_id,
                error = %e,
                "failed to look up end time, using publish time"
            );
            published_at.to_string()
        }
    }
}
