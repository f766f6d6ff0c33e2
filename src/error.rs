use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("exiftool failed for {}: {message}", path.display())]
    ExifTool { path: PathBuf, message: String },

    #[error("unexpected exiftool output for {}: {message}", path.display())]
    ExifOutput { path: PathBuf, message: String },

    #[error("{} has no {field} tag", path.display())]
    MissingField { path: PathBuf, field: &'static str },

    #[error("cannot read sidecar {}: {source}", path.display())]
    Sidecar {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("non-standard date \"{timestamp}\" on {url}, expecting e.g. \"2014-01-01 12:34:56 +03:00\"")]
    MalformedTimestamp { timestamp: String, url: String },

    #[error("{url} has no timestamp samples")]
    EmptyTrack { url: String },

    #[error("invalid timezone offset \"{0}\", expecting e.g. \"+09:00\"")]
    InvalidTimezone(String),
}

pub type Result<T> = std::result::Result<T, JournalError>;
