use std::path::Path;

use serde::{Deserialize, Serialize};

/// `[lat, lng]`; an axis that failed to parse serializes as `null`.
pub type LatLng = [Option<f64>; 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    #[serde(other)]
    Unknown,
}

impl MediaType {
    /// Classify by extension, case-insensitively: `.jpg` photos, `.mp4` videos.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "jpg" => MediaType::Image,
            "mp4" => MediaType::Video,
            _ => MediaType::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Photo creation time
    Single(String),
    /// One entry per video track sample
    Track(Vec<String>),
}

impl Timestamp {
    pub fn first(&self) -> Option<&str> {
        match self {
            Timestamp::Single(ts) => Some(ts),
            Timestamp::Track(samples) => samples.first().map(String::as_str),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Point(Option<LatLng>),
    Track(Vec<LatLng>),
}

/// One photo or video on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub url: String,
    pub timestamp: Timestamp,
    pub comment: String,
    pub location: Location,
    /// File modification time in the normalized layout (videos only)
    #[serde(skip)]
    pub modified: Option<String>,
}

impl MediaItem {
    pub fn image(url: String, timestamp: String, comment: String, location: Option<LatLng>) -> Self {
        Self {
            media_type: MediaType::Image,
            url,
            timestamp: Timestamp::Single(timestamp),
            comment,
            location: Location::Point(location),
            modified: None,
        }
    }

    /// A video with no track samples yet.
    pub fn video(url: String) -> Self {
        Self {
            media_type: MediaType::Video,
            url,
            timestamp: Timestamp::Track(Vec::new()),
            comment: String::new(),
            location: Location::Track(Vec::new()),
            modified: None,
        }
    }

    pub fn unknown(url: String) -> Self {
        Self {
            media_type: MediaType::Unknown,
            ..Self::video(url)
        }
    }

    /// Append one track sample, keeping timestamps and locations index-aligned.
    pub fn push_sample(&mut self, timestamp: String, at: LatLng) {
        if let (Timestamp::Track(samples), Location::Track(points)) =
            (&mut self.timestamp, &mut self.location)
        {
            samples.push(timestamp);
            points.push(at);
        }
    }

    /// Number of track samples (0 for photos).
    pub fn sample_count(&self) -> usize {
        match &self.timestamp {
            Timestamp::Single(_) => 0,
            Timestamp::Track(samples) => samples.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_from_path() {
        assert_eq!(MediaType::from_path(Path::new("images/a.jpg")), MediaType::Image);
        assert_eq!(MediaType::from_path(Path::new("images/A.JPG")), MediaType::Image);
        assert_eq!(MediaType::from_path(Path::new("videos/b.Mp4")), MediaType::Video);
        assert_eq!(MediaType::from_path(Path::new("images/c.jpeg")), MediaType::Unknown);
        assert_eq!(MediaType::from_path(Path::new("videos/b.srt")), MediaType::Unknown);
        assert_eq!(MediaType::from_path(Path::new("README")), MediaType::Unknown);
    }

    #[test]
    fn test_image_serialization() {
        let item = MediaItem::image(
            "images/a.jpg".to_string(),
            "2014-05-27 10:00:00 +09:00".to_string(),
            "Lunch".to_string(),
            Some([Some(37.5), None]),
        );
        assert_eq!(
            serde_json::to_string(&item).unwrap(),
            r#"{"type":"image","url":"images/a.jpg","timestamp":"2014-05-27 10:00:00 +09:00","comment":"Lunch","location":[37.5,null]}"#
        );

        let no_gps = MediaItem::image("b.jpg".into(), "t".into(), String::new(), None);
        assert!(serde_json::to_string(&no_gps).unwrap().ends_with(r#""location":null}"#));
    }

    #[test]
    fn test_video_serialization() {
        let mut item = MediaItem::video("videos/v.mp4".to_string());
        item.modified = Some("2014-05-27 10:00:00 +09:00".to_string());
        assert_eq!(
            serde_json::to_string(&item).unwrap(),
            r#"{"type":"video","url":"videos/v.mp4","timestamp":[],"comment":"","location":[]}"#
        );

        item.push_sample("2014-05-27 10:00:00 +09:00".to_string(), [Some(1.0), Some(2.0)]);
        assert_eq!(item.sample_count(), 1);
        assert_eq!(
            serde_json::to_string(&item.location).unwrap(),
            "[[1.0,2.0]]"
        );
    }

    #[test]
    fn test_push_sample_ignores_photos() {
        let mut item = MediaItem::image("a.jpg".into(), "t".into(), String::new(), None);
        item.push_sample("u".into(), [None, None]);
        assert_eq!(item.timestamp, Timestamp::Single("t".into()));
        assert_eq!(item.location, Location::Point(None));
    }

    #[test]
    fn test_unrecognized_type_reads_as_unknown() {
        let item: MediaItem = serde_json::from_str(
            r#"{"type":"audio","url":"a.wav","timestamp":[],"comment":"","location":[]}"#,
        )
        .unwrap();
        assert_eq!(item.media_type, MediaType::Unknown);
        assert_eq!(item.timestamp.first(), None);
    }
}
