use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::date;
use crate::error::{JournalError, Result};
use crate::media::{MediaItem, MediaType};

/// Group ID and title of the bucket for items with no usable date.
pub const UNGROUPED: &str = "Ungrouped";

/// Where a video with no timestamp samples lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyTrackPolicy {
    /// Put it in the `Ungrouped` bucket
    #[default]
    Ungrouped,
    /// Fall back to the file modification time
    Modified,
    /// Treat it as a fatal error
    Reject,
}

#[derive(Debug, Clone, Default)]
pub struct GroupingOptions {
    pub empty_track_policy: EmptyTrackPolicy,
}

/// One day of the trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(rename = "groupID")]
    pub group_id: String,
    pub title: String,
    pub description: String,
    pub media: Vec<MediaItem>,
}

/// Bucket items into days and order everything chronologically.
///
/// Items taken before 03:00 count towards the previous day. Groups are sorted
/// by ID and titled `Day 1`, `Day 2`, ... by position, skipping `Ungrouped`.
/// Items within a group are sorted by their representative timestamp; equal
/// timestamps keep their input order.
pub fn group_media(items: Vec<MediaItem>, options: &GroupingOptions) -> Result<Vec<Group>> {
    let mut buckets: BTreeMap<String, Vec<(Option<String>, MediaItem)>> = BTreeMap::new();

    for item in items {
        let key = representative_timestamp(&item, options.empty_track_policy)?.map(str::to_owned);
        let group_id = match &key {
            Some(ts) => group_id_for(ts, &item.url)?,
            None => UNGROUPED.to_string(),
        };
        buckets.entry(group_id).or_default().push((key, item));
    }

    let mut day = 0;
    let groups = buckets
        .into_iter()
        .map(|(group_id, mut members)| {
            members.sort_by(|a, b| a.0.cmp(&b.0));
            let title = if group_id == UNGROUPED {
                UNGROUPED.to_string()
            } else {
                day += 1;
                format!("Day {}", day)
            };
            Group {
                group_id,
                title,
                description: String::new(),
                media: members.into_iter().map(|(_, item)| item).collect(),
            }
        })
        .collect();

    Ok(groups)
}

/// The timestamp deciding an item's day and position: the photo's own, or a
/// video's first sample.
fn representative_timestamp(item: &MediaItem, policy: EmptyTrackPolicy) -> Result<Option<&str>> {
    if let Some(ts) = item.timestamp.first() {
        return Ok(Some(ts));
    }
    if item.media_type != MediaType::Video {
        return Ok(None);
    }
    match policy {
        EmptyTrackPolicy::Ungrouped => Ok(None),
        EmptyTrackPolicy::Modified => Ok(item.modified.as_deref()),
        EmptyTrackPolicy::Reject => Err(JournalError::EmptyTrack {
            url: item.url.clone(),
        }),
    }
}

fn group_id_for(timestamp: &str, url: &str) -> Result<String> {
    let wall = date::parse_timestamp(timestamp).ok_or_else(|| JournalError::MalformedTimestamp {
        timestamp: timestamp.to_string(),
        url: url.to_string(),
    })?;
    Ok(date::group_date(wall).format("%Y-%m-%d").to_string())
}
