use std::path::Path;

use chrono::{NaiveDate, TimeDelta};
use tracing::{info, warn};

use crate::error::HttpError;
use crate::http::HttpClient;
use crate::paths::audio_file_name;

use super::cycle::last_saturday;
use super::outcome::{AudioOutcome, AudioReport};

const DAYS_PER_LESSON: i64 = 7;

pub(crate) trait AudioSource {
    fn exists(&self, url: &str) -> Result<bool, HttpError>;
    fn download_to(&self, url: &str, dest: &Path) -> Result<u64, HttpError>;
}

impl AudioSource for HttpClient {
    fn exists(&self, url: &str) -> Result<bool, HttpError> {
        HttpClient::exists(self, url)
    }

    fn download_to(&self, url: &str, dest: &Path) -> Result<u64, HttpError> {
        HttpClient::download_to(self, url, dest)
    }
}

pub(crate) fn audio_url(template: &str, day: NaiveDate) -> String {
    template.replace("{date}", &day.format("%Y-%m-%d").to_string())
}

/// Fetches the seven daily readings starting at the most recent Saturday.
///
/// Finding a day that is already on disk ends the sweep for this run rather
/// than moving on to the next day. Later days are picked up once the earlier
/// files are gone.
pub(crate) fn acquire_daily_audio(
    source: &dyn AudioSource,
    folder: &Path,
    reference_date: NaiveDate,
    url_template: &str,
) -> AudioReport {
    let start = last_saturday(reference_date);
    let mut report = AudioReport::default();

    for offset in 0..DAYS_PER_LESSON {
        let day = start + TimeDelta::days(offset);
        let url = audio_url(url_template, day);
        let dest = folder.join(audio_file_name(day));

        let outcome = match source.exists(&url) {
            Ok(true) if dest.exists() => {
                info!("File {} already exists. Skipping download.", dest.display());
                report.outcomes.push((day, AudioOutcome::AlreadyPresent));
                return report;
            }
            Ok(true) => {
                info!("Downloading {url}");
                match source.download_to(&url, &dest) {
                    Ok(bytes) => {
                        info!("Downloaded: {} ({bytes} bytes)", dest.display());
                        AudioOutcome::Downloaded(bytes)
                    }
                    Err(err) => {
                        warn!("Error downloading {url}: {err}");
                        AudioOutcome::Failed(err.to_string())
                    }
                }
            }
            Ok(false) => {
                warn!("File not found for {day}. Skipping.");
                AudioOutcome::Unavailable
            }
            Err(err) => {
                warn!("Error checking availability for {url}: {err}");
                AudioOutcome::Failed(err.to_string())
            }
        };
        report.outcomes.push((day, outcome));
    }

    report
}
