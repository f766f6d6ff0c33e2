pub mod coords;
pub mod date;
pub mod error;
pub mod executor;
pub mod extract;
pub mod group;
pub mod media;
pub mod scan;
pub mod writer;

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use extract::{ExifTool, ExtractContext};
use group::{EmptyTrackPolicy, GroupingOptions, UNGROUPED};
use media::{MediaItem, MediaType};

pub use error::{JournalError, Result};

/// Concurrent exiftool processes unless configured otherwise.
pub const DEFAULT_JOBS: usize = 8;
pub const DEFAULT_TIMEZONE: &str = "+09:00";

fn default_inputs() -> Vec<PathBuf> {
    vec![PathBuf::from("images"), PathBuf::from("videos")]
}

fn default_output() -> PathBuf {
    PathBuf::from("media.json")
}

fn default_jobs() -> usize {
    DEFAULT_JOBS
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessOptions {
    #[serde(default = "default_inputs")]
    pub inputs: Vec<PathBuf>,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_jobs")]
    pub jobs: usize,
    /// Offset appended to photo creation dates
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// exiftool executable; looked up on PATH when unset
    #[serde(default)]
    pub exiftool: Option<PathBuf>,
    #[serde(default)]
    pub recursive: bool,
    #[serde(default)]
    pub empty_track_policy: EmptyTrackPolicy,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            inputs: default_inputs(),
            output: default_output(),
            jobs: DEFAULT_JOBS,
            timezone: default_timezone(),
            exiftool: None,
            recursive: false,
            empty_track_policy: EmptyTrackPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessResult {
    pub images: u64,
    pub videos: u64,
    /// Files skipped for their extension
    pub ignored: u64,
    /// Day groups, not counting `Ungrouped`
    pub days: u64,
    pub ungrouped: u64,
}

/// Progress sink: `(stage, current, total, message)`. May borrow from the caller.
pub type ProgressCallback<'a> = dyn Fn(&str, u64, u64, &str) + Send + Sync + 'a;

/// Minimum gap between two intermediate progress reports.
const PROGRESS_INTERVAL: Duration = Duration::from_millis(200);

/// Forwards progress to a callback, dropping intermediate reports that come
/// faster than `PROGRESS_INTERVAL`. The first and last report of a stage always pass.
pub struct ThrottledProgress<'a> {
    sink: &'a ProgressCallback<'a>,
    last_report: Mutex<Option<Instant>>,
}

impl<'a> ThrottledProgress<'a> {
    pub fn new(sink: &'a ProgressCallback<'a>) -> Self {
        Self {
            sink,
            last_report: Mutex::new(None),
        }
    }

    pub fn report(&self, stage: &str, current: u64, total: u64, message: &str) {
        if current + 1 < total {
            let Ok(mut last) = self.last_report.lock() else {
                return;
            };
            if last.is_some_and(|at| at.elapsed() < PROGRESS_INTERVAL) {
                return;
            }
            *last = Some(Instant::now());
        }
        (self.sink)(stage, current, total, message);
    }
}

/// Run the whole pipeline: list inputs, extract metadata, group by day and
/// write the timeline. Nothing is written unless every file succeeds.
pub fn process(
    options: &ProcessOptions,
    progress_callback: &ProgressCallback<'_>,
) -> anyhow::Result<ProcessResult> {
    let tp = ThrottledProgress::new(progress_callback);
    let timezone = date::parse_timezone(&options.timezone)?;
    let exiftool = options
        .exiftool
        .as_ref()
        .map(ExifTool::new)
        .unwrap_or_default();

    // Stage 1: List input directories
    let scan = scan::scan_inputs(&options.inputs, options.recursive)?;
    let images = scan.count(MediaType::Image) as u64;
    let videos = scan.count(MediaType::Video) as u64;
    let ignored = scan.ignored as u64;
    info!("found {} images, {} videos, ignored {} files", images, videos, ignored);

    if scan.media.is_empty() {
        warn!("no .jpg or .mp4 files in {:?}, nothing to write", options.inputs);
        return Ok(ProcessResult {
            ignored,
            ..ProcessResult::default()
        });
    }

    if images > 0 {
        let version = exiftool
            .version()
            .with_context(|| format!("cannot run {}", exiftool.program().display()))?;
        info!("using exiftool {}", version);
    }

    // Stage 2: Extract metadata, at most `jobs` exiftool processes at a time
    let ctx = ExtractContext { exiftool, timezone };
    let total = scan.media.len() as u64;
    let mut completed = 0u64;
    let mut items = executor::run_bounded(
        scan.media,
        options.jobs,
        |path| extract::extract_file(&path, &ctx),
        |item: &MediaItem| {
            tp.report("extract", completed, total, &item.url);
            completed += 1;
        },
    )
    .context("metadata extraction failed, no output written")?;

    // Completion order is arbitrary; fix the order equal timestamps keep
    items.sort_by(|a, b| a.url.cmp(&b.url));

    // Stage 3: Group into days
    let grouping = GroupingOptions {
        empty_track_policy: options.empty_track_policy,
    };
    let groups = group::group_media(items, &grouping).context("grouping failed, no output written")?;
    let ungrouped = groups
        .iter()
        .find(|g| g.group_id == UNGROUPED)
        .map_or(0, |g| g.media.len() as u64);
    let days = groups.iter().filter(|g| g.group_id != UNGROUPED).count() as u64;

    // Stage 4: Write output
    writer::write_media_json(&groups, &options.output)?;
    info!("wrote {} groups to {}", groups.len(), options.output.display());

    Ok(ProcessResult {
        images,
        videos,
        ignored,
        days,
        ungrouped,
    })
}
