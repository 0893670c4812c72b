mod audio;
mod catalog;
mod cycle;
mod ledger;
mod matching;
mod outcome;
mod retention;
mod videos;


use anyhow::Result;
use chrono::Local;
use tracing::{info, warn};

use crate::cli::Cli;
use crate::config::AppConfig;
use crate::http::HttpClient;
use crate::paths::{downloads_root, lesson_folder};

use self::audio::acquire_daily_audio;
use self::catalog::YtDlp;
use self::cycle::LessonCycle;
use self::outcome::{
    AudioOutcome, AudioReport, RetentionOutcome, RetentionReport, VideoOutcome, VideoReport,
};
use self::retention::{RetentionRules, reconcile};
use self::videos::{VideoJob, acquire_videos};

/// One full sweep: clean the lesson folder, fetch matching videos, then the
/// week's daily audio. Failures are narrated, never returned.
pub fn run(_cli: Cli, config: AppConfig) -> Result<()> {
    let today = Local::now().date_naive();
    let cycle = LessonCycle::resolve(today);
    info!(
        "Preparing {} Q{} lesson {} (today is {today})",
        cycle.year, cycle.quarter, cycle.lesson
    );

    let folder = match downloads_root().and_then(|root| lesson_folder(&root, cycle.lesson)) {
        Ok(folder) => folder,
        Err(err) => {
            warn!("{err:#}; nothing to do without a lesson folder");
            return Ok(());
        }
    };
    info!("Lesson folder: {}", folder.display());

    let retention = match RetentionRules::new() {
        Ok(rules) => reconcile(&rules, &folder, cycle, today),
        Err(err) => {
            warn!("{err:#}; skipping cleanup");
            RetentionReport::default()
        }
    };

    let ytdlp = YtDlp::new(&config.ytdlp_bin, config.catalog_depth);
    let job = VideoJob {
        channels: &config.channels,
        cycle,
        folder: &folder,
        format_spec: &config.format_spec,
        catalog_depth: config.catalog_depth,
    };
    let videos = acquire_videos(&ytdlp, &ytdlp, &job);

    let http = HttpClient::new(config.http_connect_timeout, config.http_read_timeout);
    let audio = acquire_daily_audio(&http, &folder, today, &config.audio_url_template);

    print_summary(&retention, &videos, &audio);
    Ok(())
}

fn print_summary(retention: &RetentionReport, videos: &VideoReport, audio: &AudioReport) {
    info!(
        "Cleanup: {} removed, {} kept, {} failed",
        retention.count(|outcome| matches!(outcome, RetentionOutcome::Removed)),
        retention.count(|outcome| matches!(outcome, RetentionOutcome::Kept)),
        retention.count(|outcome| matches!(outcome, RetentionOutcome::Failed(_))),
    );
    info!(
        "Videos: {} downloaded, {} already downloaded, {} failed ({} of {} channels unavailable)",
        videos.count(|outcome| matches!(outcome, VideoOutcome::Downloaded)),
        videos.count(|outcome| matches!(outcome, VideoOutcome::AlreadyInLedger)),
        videos.count(|outcome| matches!(outcome, VideoOutcome::Failed(_))),
        videos.channels_failed,
        videos.channels_searched,
    );
    let audio_bytes: u64 = audio
        .outcomes
        .iter()
        .filter_map(|(_, outcome)| match outcome {
            AudioOutcome::Downloaded(bytes) => Some(*bytes),
            _ => None,
        })
        .sum();
    let audio_line = format!(
        "Audio: {} downloaded ({audio_bytes} bytes), {} unavailable, {} failed",
        audio.count(|outcome| matches!(outcome, AudioOutcome::Downloaded(_))),
        audio.count(|outcome| matches!(outcome, AudioOutcome::Unavailable)),
        audio.count(|outcome| matches!(outcome, AudioOutcome::Failed(_))),
    );
    if audio.stopped_early() {
        info!("{audio_line} (stopped at first day already on disk)");
    } else {
        info!("{audio_line}");
    }

    for (name, outcome) in &retention.outcomes {
        if let RetentionOutcome::Failed(detail) = outcome {
            warn!("Not removed: {name}: {detail}");
        }
    }
    for (found, outcome) in &videos.outcomes {
        if let VideoOutcome::Failed(detail) = outcome {
            warn!("Not downloaded: {} ({}): {detail}", found.title, found.url);
        }
    }
    for (day, outcome) in &audio.outcomes {
        if let AudioOutcome::Failed(detail) = outcome {
            warn!("Missing audio for {day}: {detail}");
        }
    }
}
