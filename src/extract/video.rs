use std::fs;
use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use filetime::FileTime;
use tracing::debug;

use crate::coords::parse_wgs84;
use crate::date;
use crate::error::{JournalError, Result};
use crate::media::MediaItem;

/// Subtitle sidecar written by the camera next to each clip.
const SIDECAR_EXTENSIONS: &[&str] = &["srt", "SRT"];

// Line positions inside one subtitle block: counter, time range, timestamp, coordinates
const TIMESTAMP_LINE: usize = 2;
const COORDINATE_LINE: usize = 3;

/// Build a video item from its subtitle sidecar, if any.
///
/// A missing sidecar is not an error: the item simply has no samples.
pub fn extract_video(path: &Path, timezone: FixedOffset) -> Result<MediaItem> {
    let mut item = MediaItem::video(path.to_string_lossy().into_owned());
    item.modified = modified_timestamp(path, timezone);

    let Some(sidecar) = find_sidecar(path) else {
        debug!("no sidecar for {}", path.display());
        return Ok(item);
    };

    let bytes = fs::read(&sidecar).map_err(|source| JournalError::Sidecar {
        path: sidecar.clone(),
        source,
    })?;
    let skipped = parse_sidecar(&String::from_utf8_lossy(&bytes), &mut item);
    debug!(
        "{}: {} samples, {} blocks skipped",
        sidecar.display(),
        item.sample_count(),
        skipped
    );

    Ok(item)
}

/// Sidecar sharing the video's stem, e.g. `DJI_0001.MP4` -> `DJI_0001.srt`.
pub fn find_sidecar(video: &Path) -> Option<PathBuf> {
    let stem = video.file_stem()?.to_str()?;
    let parent = video.parent().unwrap_or_else(|| Path::new(""));

    SIDECAR_EXTENSIONS
        .iter()
        .map(|ext| parent.join(format!("{}.{}", stem, ext)))
        .find(|candidate| candidate.is_file())
}

/// Append every complete block of `content` to the item's tracks.
/// Returns the number of blocks skipped for lacking a timestamp or coordinate line.
pub fn parse_sidecar(content: &str, item: &mut MediaItem) -> usize {
    let content = content.replace("\r\n", "\n");
    let mut skipped = 0;

    for block in content.split("\n\n") {
        let lines: Vec<&str> = block.split('\n').collect();
        match (lines.get(TIMESTAMP_LINE), lines.get(COORDINATE_LINE)) {
            (Some(ts), Some(coords)) if !ts.is_empty() && !coords.is_empty() => {
                item.push_sample(ts.to_string(), parse_wgs84(coords).as_pair());
            }
            _ => skipped += 1,
        }
    }

    skipped
}

fn modified_timestamp(path: &Path, timezone: FixedOffset) -> Option<String> {
    let metadata = fs::metadata(path).ok()?;
    let mtime = FileTime::from_last_modification_time(&metadata);
    date::format_unix(mtime.unix_seconds(), mtime.nanoseconds(), timezone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{Location, MediaType, Timestamp};
    use tempfile::tempdir;

    const SIDECAR: &str = "1
00:00:00,000 --> 00:00:01,000
2014-05-27 10:00:00 +09:00
37 deg 33.06' N, 126 deg 59.28' E

2
00:00:01,000 --> 00:00:02,000
2014-05-27 10:00:01 +09:00
37 deg 33.07' N, 126 deg 59.29' E

3
00:00:02,000 --> 00:00:03,000
2014-05-27 10:00:02 +09:00
";

    fn tz() -> FixedOffset {
        date::parse_timezone("+09:00").unwrap()
    }

    #[test]
    fn test_parse_sidecar_skips_incomplete_blocks() {
        let mut item = MediaItem::video("v.mp4".into());
        let skipped = parse_sidecar(SIDECAR, &mut item);

        assert_eq!(skipped, 1);
        assert_eq!(
            item.timestamp,
            Timestamp::Track(vec![
                "2014-05-27 10:00:00 +09:00".to_string(),
                "2014-05-27 10:00:01 +09:00".to_string(),
            ])
        );
        let Location::Track(points) = &item.location else {
            panic!("video location should be a track");
        };
        assert_eq!(points.len(), 2);
        let lat = points[0][0].unwrap();
        assert!((lat - (37.0 + 33.06 / 60.0)).abs() < 1e-9);
    }

    #[test]
    fn test_parse_sidecar_crlf() {
        let mut item = MediaItem::video("v.mp4".into());
        parse_sidecar(&SIDECAR.replace('\n', "\r\n"), &mut item);
        assert_eq!(item.sample_count(), 2);
        assert_eq!(item.timestamp.first(), Some("2014-05-27 10:00:00 +09:00"));
    }

    #[test]
    fn test_unparsable_coordinates_keep_sample() {
        let mut item = MediaItem::video("v.mp4".into());
        parse_sidecar("1\n00:00\n2014-05-27 10:00:00 +09:00\nsomewhere\n", &mut item);
        assert_eq!(item.location, Location::Track(vec![[None, None]]));
    }

    #[test]
    fn test_video_without_sidecar() {
        let dir = tempdir().unwrap();
        let video = dir.path().join("clip.mp4");
        fs::write(&video, b"").unwrap();

        let item = extract_video(&video, tz()).unwrap();
        assert_eq!(item.media_type, MediaType::Video);
        assert_eq!(item.timestamp, Timestamp::Track(vec![]));
        assert_eq!(item.location, Location::Track(vec![]));
        assert_eq!(item.comment, "");
        assert!(item.modified.as_deref().unwrap().ends_with("+09:00"));
    }

    #[test]
    fn test_video_with_uppercase_sidecar() {
        let dir = tempdir().unwrap();
        let video = dir.path().join("DJI_0001.MP4");
        fs::write(&video, b"").unwrap();
        fs::write(dir.path().join("DJI_0001.SRT"), SIDECAR).unwrap();

        assert!(find_sidecar(&video).is_some());
        let item = extract_video(&video, tz()).unwrap();
        assert_eq!(item.sample_count(), 2);
        assert_eq!(item.url, video.to_string_lossy());
    }
}
