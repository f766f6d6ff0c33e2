pub mod exiftool;
pub mod image;
pub mod video;

use std::path::Path;

use chrono::FixedOffset;

use crate::error::Result;
use crate::media::{MediaItem, MediaType};

pub use exiftool::ExifTool;

/// Read-only context shared by every extraction job.
#[derive(Debug, Clone)]
pub struct ExtractContext {
    pub exiftool: ExifTool,
    /// Offset appended to photo creation dates, which carry none
    pub timezone: FixedOffset,
}

/// Extract one file, dispatching on its extension.
pub fn extract_file(path: &Path, ctx: &ExtractContext) -> Result<MediaItem> {
    match MediaType::from_path(path) {
        MediaType::Image => image::extract_image(&ctx.exiftool, path, ctx.timezone),
        MediaType::Video => video::extract_video(path, ctx.timezone),
        MediaType::Unknown => Ok(MediaItem::unknown(path.to_string_lossy().into_owned())),
    }
}
