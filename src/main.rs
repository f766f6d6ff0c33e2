use std::path::PathBuf;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use travel_journal::group::EmptyTrackPolicy;
use travel_journal::ProcessOptions;

#[derive(Parser)]
#[command(name = "travel-journal", version, about = "Group geotagged photos and videos into a day-by-day travel timeline")]
struct Cli {
    /// Directories holding .jpg photos and .mp4 videos (with optional .srt sidecars)
    #[arg(default_values = ["images", "videos"])]
    inputs: Vec<PathBuf>,

    /// Timeline file to write
    #[arg(short, long, default_value = "media.json")]
    output: PathBuf,

    /// Maximum number of exiftool processes running at once
    #[arg(short, long, default_value_t = travel_journal::DEFAULT_JOBS)]
    jobs: usize,

    /// UTC offset of the camera clock, appended to photo creation dates
    #[arg(long, default_value = travel_journal::DEFAULT_TIMEZONE, allow_hyphen_values = true)]
    timezone: String,

    /// Path to the exiftool executable
    #[arg(long, env = "TRAVEL_JOURNAL_EXIFTOOL")]
    exiftool: Option<PathBuf>,

    /// Also scan subdirectories of the inputs
    #[arg(short, long)]
    recursive: bool,

    /// Where videos without GPS/time samples go
    #[arg(long, value_enum, default_value_t = EmptyTrackPolicy::Ungrouped)]
    empty_track: EmptyTrackPolicy,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let t_total = std::time::Instant::now();

    let options = ProcessOptions {
        inputs: cli.inputs,
        output: cli.output,
        jobs: cli.jobs,
        timezone: cli.timezone,
        exiftool: cli.exiftool,
        recursive: cli.recursive,
        empty_track_policy: cli.empty_track,
    };

    let pb = ProgressBar::new(0);
    pb.set_style(ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} {msg}")?);

    let bar = pb.clone();
    let result = travel_journal::process(&options, &move |stage, current, total, message| {
        bar.set_length(total);
        bar.set_position(current + 1);
        bar.set_message(format!("{} {}", stage, message));
    });
    pb.finish_and_clear();
    let result = result?;

    eprintln!(
        "Done! {} images, {} videos in {} days ({} ungrouped), {} files ignored ({:.2}s)",
        result.images,
        result.videos,
        result.days,
        result.ungrouped,
        result.ignored,
        t_total.elapsed().as_secs_f64()
    );

    Ok(())
}
