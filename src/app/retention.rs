use std::fs;
use std::io;
use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use regex::Regex;
use tracing::{info, warn};

use super::cycle::{LessonCycle, last_saturday};
use super::outcome::{RetentionOutcome, RetentionReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    Lesson(u32),
    Dated(NaiveDate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    Keep(Scope),
    Remove(Scope),
    Unrecognized,
}

pub(crate) struct RetentionRules {
    lesson_marker: Regex,
    iso_date: Regex,
}

impl RetentionRules {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            lesson_marker: Regex::new(r"(?i)Lesson (\d+)")?,
            iso_date: Regex::new(r"(\d{4}-\d{2}-\d{2})")?,
        })
    }

    /// A lesson marker wins over a date; names with neither are left alone.
    pub(crate) fn classify(&self, file_name: &str, lesson: u32, keep_from: NaiveDate) -> Verdict {
        let marked_lesson = self
            .lesson_marker
            .captures(file_name)
            .and_then(|caps| caps[1].parse::<u32>().ok());
        if let Some(found) = marked_lesson {
            let scope = Scope::Lesson(found);
            return if found == lesson {
                Verdict::Keep(scope)
            } else {
                Verdict::Remove(scope)
            };
        }

        let dated = self
            .iso_date
            .captures(file_name)
            .and_then(|caps| NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok());
        match dated {
            Some(day) if day >= keep_from => Verdict::Keep(Scope::Dated(day)),
            Some(day) => Verdict::Remove(Scope::Dated(day)),
            None => Verdict::Unrecognized,
        }
    }
}

/// Removes files that belong to another lesson or to an audio week that has
/// already passed. Each file is handled on its own; a failed delete is
/// reported and the sweep continues.
pub(crate) fn reconcile(
    rules: &RetentionRules,
    folder: &Path,
    cycle: LessonCycle,
    today: NaiveDate,
) -> RetentionReport {
    reconcile_with(rules, folder, cycle, today, &|path: &Path| fs::remove_file(path))
}

pub(crate) fn reconcile_with(
    rules: &RetentionRules,
    folder: &Path,
    cycle: LessonCycle,
    today: NaiveDate,
    remove: &dyn Fn(&Path) -> io::Result<()>,
) -> RetentionReport {
    let keep_from = last_saturday(today);
    let mut report = RetentionReport::default();

    let entries = match fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("Cannot list {}: {err}", folder.display());
            return report;
        }
    };

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => {
                if entry.file_type().map(|kind| kind.is_file()).unwrap_or(false) {
                    files.push(entry.path());
                }
            }
            Err(err) => warn!("Cannot read entry in {}: {err}", folder.display()),
        }
    }
    files.sort();

    for path in files {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let outcome = match rules.classify(&name, cycle.lesson, keep_from) {
            Verdict::Keep(Scope::Lesson(_)) => {
                info!("Keeping current lesson file: {name}");
                RetentionOutcome::Kept
            }
            Verdict::Keep(Scope::Dated(_)) => {
                info!("Keeping recent lesson file (date-based): {name}");
                RetentionOutcome::Kept
            }
            Verdict::Remove(scope) => match remove(&path) {
                Ok(()) => {
                    match scope {
                        Scope::Lesson(found) => {
                            info!("Removed lesson {found} file: {name}")
                        }
                        Scope::Dated(day) => {
                            info!("Removed audio file older than {keep_from} ({day}): {name}")
                        }
                    }
                    RetentionOutcome::Removed
                }
                Err(err) => {
                    warn!("Could not remove {name}: {err}");
                    RetentionOutcome::Failed(err.to_string())
                }
            },
            Verdict::Unrecognized => {
                info!("Skipping non-lesson file: {name}");
                RetentionOutcome::Untouched
            }
        };
        report.outcomes.push((name, outcome));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn rules() -> RetentionRules {
        RetentionRules::new().expect("patterns compile")
    }

    #[test]
    fn lesson_marker_decides_by_number() {
        let rules = rules();
        let keep_from = ymd(2024, 5, 4);
        assert_eq!(
            rules.classify("Lesson 3 notes.mp4", 4, keep_from),
            Verdict::Remove(Scope::Lesson(3))
        );
        assert_eq!(
            rules.classify("Lesson 3 notes.mp4", 3, keep_from),
            Verdict::Keep(Scope::Lesson(3))
        );
        assert_eq!(
            rules.classify("HOPE SS LESSON 13: Rest.mp4", 13, keep_from),
            Verdict::Keep(Scope::Lesson(13))
        );
    }

    #[test]
    fn lesson_marker_takes_precedence_over_date() {
        let verdict = rules().classify("Lesson 2 2020-01-01.mp4", 2, ymd(2024, 5, 4));
        assert_eq!(verdict, Verdict::Keep(Scope::Lesson(2)));
    }

    #[test]
    fn dated_files_kept_from_last_saturday_on() {
        let rules = rules();
        let day = ymd(2024, 5, 10);
        assert_eq!(
            rules.classify("2024-05-10.mp3", 4, ymd(2024, 5, 11)),
            Verdict::Remove(Scope::Dated(day))
        );
        assert_eq!(
            rules.classify("2024-05-10.mp3", 4, ymd(2024, 5, 10)),
            Verdict::Keep(Scope::Dated(day))
        );
        assert_eq!(
            rules.classify("2024-05-10.mp3", 4, ymd(2024, 5, 4)),
            Verdict::Keep(Scope::Dated(day))
        );
    }

    #[test]
    fn other_files_are_unrecognized() {
        let rules = rules();
        let keep_from = ymd(2024, 5, 4);
        assert_eq!(
            rules.classify("downloaded_videos_lesson_4.txt", 4, keep_from),
            Verdict::Unrecognized
        );
        assert_eq!(rules.classify("notes.txt", 4, keep_from), Verdict::Unrecognized);
        assert_eq!(rules.classify("2024-13-45.mp3", 4, keep_from), Verdict::Unrecognized);
    }

    #[test]
    fn reconcile_removes_only_stale_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let folder = dir.path();
        for name in [
            "Lesson 3 notes.mp4",
            "Lesson 4 - The Promise.mp4",
            "2024-05-03.mp3",
            "2024-05-04.mp3",
            "downloaded_videos_lesson_4.txt",
        ] {
            fs::write(folder.join(name), b"x").expect("seed file");
        }
        fs::create_dir(folder.join("Lesson 1 extras")).expect("seed dir");

        let cycle = LessonCycle {
            year: 2024,
            quarter: 2,
            lesson: 4,
        };
        let report = reconcile(&rules(), folder, cycle, ymd(2024, 5, 8));

        assert!(!folder.join("Lesson 3 notes.mp4").exists());
        assert!(!folder.join("2024-05-03.mp3").exists());
        assert!(folder.join("Lesson 4 - The Promise.mp4").exists());
        assert!(folder.join("2024-05-04.mp3").exists());
        assert!(folder.join("downloaded_videos_lesson_4.txt").exists());
        assert!(folder.join("Lesson 1 extras").is_dir());

        assert_eq!(report.count(|outcome| matches!(outcome, RetentionOutcome::Removed)), 2);
        assert_eq!(report.count(|outcome| matches!(outcome, RetentionOutcome::Kept)), 2);
        assert_eq!(report.count(|outcome| matches!(outcome, RetentionOutcome::Untouched)), 1);
    }

    #[test]
    fn reconcile_on_missing_folder_reports_nothing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let cycle = LessonCycle {
            year: 2024,
            quarter: 2,
            lesson: 4,
        };
        let report = reconcile(&rules(), &dir.path().join("absent"), cycle, ymd(2024, 5, 8));
        assert!(report.outcomes.is_empty());
    }

    #[test]
    fn failed_delete_is_reported_and_later_files_still_removed() {
        let dir = tempfile::tempdir().expect("temp dir");
        let folder = dir.path();
        for name in ["2024-05-01.mp3", "Lesson 1 intro.mp4", "Lesson 2 recap.mp4"] {
            fs::write(folder.join(name), b"x").expect("seed file");
        }
        let locked = |path: &Path| {
            if path.ends_with("Lesson 1 intro.mp4") {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
            } else {
                fs::remove_file(path)
            }
        };

        let cycle = LessonCycle {
            year: 2024,
            quarter: 2,
            lesson: 4,
        };
        let report = reconcile_with(&rules(), folder, cycle, ymd(2024, 5, 8), &locked);

        let names = report
            .outcomes
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["2024-05-01.mp3", "Lesson 1 intro.mp4", "Lesson 2 recap.mp4"]);
        assert_eq!(report.outcomes[0].1, RetentionOutcome::Removed);
        assert!(matches!(report.outcomes[1].1, RetentionOutcome::Failed(_)));
        assert_eq!(report.outcomes[2].1, RetentionOutcome::Removed);
        assert!(folder.join("Lesson 1 intro.mp4").exists());
        assert!(!folder.join("Lesson 2 recap.mp4").exists());
        assert!(!folder.join("2024-05-01.mp3").exists());
    }
}
