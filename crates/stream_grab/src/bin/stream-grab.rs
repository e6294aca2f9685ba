use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use stream_grab::{
    tracing::init_tracing_subscriber, yt::scraper::Scraper, DownloadOrchestratorBuilder,
    FetchOutcome, ItemReport, Mode,
};
use stream_source::{Ffmpeg, YtDlp};

#[derive(Parser)]
#[command(
    name = "stream-grab",
    about = "Download YouTube videos or whole channels, optionally as mp3"
)]
struct Cli {
    /// URL of the YouTube video to download
    #[arg(short, long, conflicts_with = "channel")]
    url: Option<String>,

    /// URL of the YouTube channel to download
    #[arg(short, long)]
    channel: Option<String>,

    /// Download mode
    #[arg(short, long, value_enum, default_value_t = Mode::Video)]
    mode: Mode,

    /// Path to save the video/channel in
    #[arg(short, long, default_value = ".")]
    path: PathBuf,

    /// Maximum concurrent downloads, 0 for no limit
    #[arg(short, long, env = "STREAM_GRAB_JOBS", default_value = "4")]
    jobs: usize,

    /// Keep downloading the rest of a channel when an item fails
    #[arg(long)]
    keep_going: bool,

    /// Path to the yt-dlp executable
    #[arg(long = "yt-dlp", env = "YTDLP_PATH")]
    ytdlp_path: Option<PathBuf>,

    /// Path to the ffmpeg executable
    #[arg(long = "ffmpeg", env = "FFMPEG_PATH")]
    ffmpeg_path: Option<PathBuf>,

    /// Path to yt-dlp cookies file
    #[arg(long, env = "YTDLP_COOKIES_PATH")]
    cookies_path: Option<PathBuf>,
}

enum Target {
    Video(String),
    Channel(String),
}

impl Cli {
    fn target(&self) -> Option<Target> {
        match (&self.url, &self.channel) {
            (Some(url), _) => Some(Target::Video(url.clone())),
            (None, Some(channel)) => Some(Target::Channel(channel.clone())),
            (None, None) => None,
        }
    }
}

fn log_channel_summary(outcomes: &[&FetchOutcome]) {
    let skipped = outcomes.iter().filter(|o| o.is_skipped()).count();
    tracing::info!(
        saved = outcomes.len() - skipped,
        skipped,
        "Channel download complete"
    );
}

fn check_reports(reports: &[ItemReport]) -> anyhow::Result<()> {
    let outcomes = reports
        .iter()
        .filter_map(|r| r.result.as_ref().ok())
        .collect::<Vec<_>>();
    log_channel_summary(&outcomes);

    let failed = reports.len() - outcomes.len();
    if failed > 0 {
        for report in reports.iter().filter(|r| r.result.is_err()) {
            tracing::error!(url = %report.url, "Not downloaded");
        }
        anyhow::bail!("{failed} of {} downloads failed", reports.len());
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let Some(target) = cli.target() else {
        Cli::command().print_help()?;
        eprintln!("\nPlease provide either a video or channel URL.");
        std::process::exit(1);
    };

    std::fs::create_dir_all(&cli.path)
        .with_context(|| format!("Failed to create output directory {}", cli.path.display()))?;

    let mut yt_dlp = YtDlp::new(cli.ytdlp_path)?;
    if let Some(cookies_path) = cli.cookies_path {
        yt_dlp = yt_dlp.with_cookies(cookies_path);
    }

    // only audio mode ever runs ffmpeg
    let ffmpeg = match cli.mode {
        Mode::Audio => Ffmpeg::new(cli.ffmpeg_path)?,
        Mode::Video => Ffmpeg::unchecked(cli.ffmpeg_path),
    };

    let orchestrator = DownloadOrchestratorBuilder::new(&cli.path)
        .video_source(yt_dlp)
        .audio_processor(ffmpeg)
        .channel_scraper(Scraper::default())
        .mode(cli.mode)
        .max_concurrent_downloads(cli.jobs)
        .build();

    match target {
        Target::Video(url) => {
            orchestrator.download_video(&url).await?;
        }
        Target::Channel(channel) if cli.keep_going => {
            let reports = orchestrator.download_channel_settled(&channel).await?;
            check_reports(&reports)?;
        }
        Target::Channel(channel) => {
            let outcomes = orchestrator.download_channel(&channel).await?;
            log_channel_summary(&outcomes.iter().collect::<Vec<_>>());
        }
    }

    Ok(())
}
