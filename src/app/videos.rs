use std::path::Path;

use tracing::{info, warn};

use crate::config::ChannelSpec;

use super::catalog::{FetchRequest, VideoCatalog, VideoFetcher};
use super::cycle::LessonCycle;
use super::ledger::DownloadLedger;
use super::matching::{MatchResult, match_channel};
use super::outcome::{VideoOutcome, VideoReport};

pub(crate) struct VideoJob<'a> {
    pub(crate) channels: &'a [ChannelSpec],
    pub(crate) cycle: LessonCycle,
    pub(crate) folder: &'a Path,
    pub(crate) format_spec: &'a str,
    pub(crate) catalog_depth: usize,
}

/// Searches every channel for the lesson and fetches each match once.
/// Channels and videos are handled one at a time and independently.
pub(crate) fn acquire_videos(
    catalog: &dyn VideoCatalog,
    fetcher: &dyn VideoFetcher,
    job: &VideoJob<'_>,
) -> VideoReport {
    let mut ledger = match DownloadLedger::load(job.folder, job.cycle.lesson) {
        Ok(ledger) => ledger,
        Err(err) => {
            warn!("{err:#}; continuing without prior download history");
            DownloadLedger::empty(job.folder, job.cycle.lesson)
        }
    };
    let mut report = VideoReport::default();

    for spec in job.channels {
        report.channels_searched += 1;
        let found = match_channel(catalog, spec, job.cycle);
        info!("Channel: {}", spec.channel_url);
        info!(
            "  Searching for: '{}' (mode: {})",
            found.phrase,
            spec.match_mode.as_str()
        );

        let matches = match found.result {
            Ok(matches) => matches,
            Err(err) => {
                warn!("  Error fetching channel {}: {err}", spec.channel_url);
                report.channels_failed += 1;
                continue;
            }
        };

        if matches.is_empty() {
            info!("  No matches found in latest {} videos.", job.catalog_depth);
            continue;
        }

        info!("  Found {} match(es):", matches.len());
        for (idx, found) in matches.iter().enumerate() {
            info!("    {}. {}", idx + 1, found.title);
            info!("       {}", found.url);
        }

        for found in matches {
            let outcome = fetch_one(fetcher, &mut ledger, job, &found);
            report.outcomes.push((found, outcome));
        }
    }

    report
}

fn fetch_one(
    fetcher: &dyn VideoFetcher,
    ledger: &mut DownloadLedger,
    job: &VideoJob<'_>,
    found: &MatchResult,
) -> VideoOutcome {
    if ledger.contains(&found.video_id) {
        info!("  Already downloaded, skipping: {}", found.title);
        return VideoOutcome::AlreadyInLedger;
    }

    info!("  Downloading {} in format {}", found.title, job.format_spec);
    let request = FetchRequest {
        url: &found.url,
        format_spec: job.format_spec,
        folder: job.folder,
        ledger: ledger.path(),
        lesson: job.cycle.lesson,
    };
    match fetcher.fetch(&request) {
        Ok(()) => {
            if let Err(err) = ledger.record(&found.video_id) {
                warn!("  {err:#}");
            }
            info!("  Downloaded: {}", found.title);
            VideoOutcome::Downloaded
        }
        Err(err) => {
            warn!("  Download failed for {}: {err}", found.url);
            VideoOutcome::Failed(err.to_string())
        }
    }
}
