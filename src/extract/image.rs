use std::path::Path;

use chrono::FixedOffset;
use serde_json::Value;

use super::ExifTool;
use crate::error::{JournalError, Result};
use crate::media::{LatLng, MediaItem};

/// Only the tags the timeline needs, GPS as signed decimals, dates without offset.
const EXIFTOOL_ARGS: &[&str] = &[
    "-GPSPosition",
    "-CreateDate",
    "-ImageDescription",
    "-coordFormat",
    "%+.6f",
    "-dateFormat",
    "%Y-%m-%d %H:%M:%S",
    "-json",
];

/// Run exiftool on one photo and build its timeline item.
pub fn extract_image(exiftool: &ExifTool, path: &Path, timezone: FixedOffset) -> Result<MediaItem> {
    let stdout = exiftool.run(EXIFTOOL_ARGS, path)?;
    parse_exiftool_json(path, &stdout, timezone)
}

/// Build an item from exiftool's `-json` output (an array holding one object).
pub fn parse_exiftool_json(path: &Path, stdout: &[u8], timezone: FixedOffset) -> Result<MediaItem> {
    let records: Vec<Value> = serde_json::from_slice(stdout).map_err(|e| JournalError::ExifOutput {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let record = records
        .into_iter()
        .next()
        .ok_or_else(|| JournalError::ExifOutput {
            path: path.to_path_buf(),
            message: "empty result array".to_string(),
        })?;

    let url = tag_string(&record, "SourceFile")
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    let created = tag_string(&record, "CreateDate").ok_or_else(|| JournalError::MissingField {
        path: path.to_path_buf(),
        field: "CreateDate",
    })?;
    let comment = tag_string(&record, "ImageDescription")
        .map(|d| d.trim().to_string())
        .unwrap_or_default();
    let location = tag_string(&record, "GPSPosition").map(|p| parse_gps_position(&p));

    Ok(MediaItem::image(
        url,
        format!("{} {}", created.trim(), timezone),
        comment,
        location,
    ))
}

/// `"+43.638719, -116.241350"` as printed with `-coordFormat %+.6f`.
fn parse_gps_position(position: &str) -> LatLng {
    let mut halves = position
        .split(", ")
        .map(|half| half.trim().parse::<f64>().ok().filter(|v| v.is_finite()));
    [halves.next().flatten(), halves.next().flatten()]
}

/// String value of a tag; exiftool prints numeric-looking values as JSON numbers.
fn tag_string(record: &Value, tag: &str) -> Option<String> {
    match record.get(tag)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
