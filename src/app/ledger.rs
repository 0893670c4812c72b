use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::paths::ledger_path;

const EXTRACTOR: &str = "youtube";

/// Per-lesson set of fetched video ids, stored in the `--download-archive`
/// format (`youtube <id>` per line) so yt-dlp and this tool share one file.
#[derive(Debug)]
pub(crate) struct DownloadLedger {
    path: PathBuf,
    ids: HashSet<String>,
}

impl DownloadLedger {
    pub(crate) fn load(folder: &Path, lesson: u32) -> Result<Self> {
        let path = ledger_path(folder, lesson);
        let ids = read_ids(&path)?;
        Ok(Self { path, ids })
    }

    /// Ledger for a file that could not be read; ids are still recorded to it.
    pub(crate) fn empty(folder: &Path, lesson: u32) -> Self {
        Self {
            path: ledger_path(folder, lesson),
            ids: HashSet::new(),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn contains(&self, video_id: &str) -> bool {
        self.ids.contains(video_id)
    }

    /// Adds an id to the file unless it is already there. The fetcher may have
    /// written it itself, so the file is re-read before appending.
    pub(crate) fn record(&mut self, video_id: &str) -> Result<()> {
        if !self.contains(video_id) {
            self.ids.extend(read_ids(&self.path)?);
        }
        if !self.contains(video_id) {
            append_line(&self.path, video_id)
                .with_context(|| format!("failed to append to ledger {}", self.path.display()))?;
            self.ids.insert(video_id.to_string());
        }
        Ok(())
    }
}

fn read_ids(path: &Path) -> Result<HashSet<String>> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(parse_ledger(&raw)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(HashSet::new()),
        Err(err) => Err(err).with_context(|| format!("failed to read ledger {}", path.display())),
    }
}

fn append_line(path: &Path, video_id: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{EXTRACTOR} {video_id}")
}

pub(crate) fn parse_ledger(raw: &str) -> HashSet<String> {
    raw.lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let first = parts.next()?;
            Some(parts.next().unwrap_or(first).to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ledger_reads_archive_lines() {
        let ids = parse_ledger("youtube abc123\n\n  youtube def456  \nbare-id\n");
        assert_eq!(ids.len(), 3);
        assert!(ids.contains("abc123"));
        assert!(ids.contains("def456"));
        assert!(ids.contains("bare-id"));
    }

    #[test]
    fn missing_ledger_loads_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let ledger = DownloadLedger::load(dir.path(), 4).expect("missing file is fine");
        assert!(!ledger.contains("abc123"));
        assert!(ledger.path().ends_with("downloaded_videos_lesson_4.txt"));
    }

    #[test]
    fn recorded_ids_survive_reload() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut ledger = DownloadLedger::load(dir.path(), 4).expect("load ledger");
        ledger.record("abc123").expect("record id");
        ledger.record("abc123").expect("duplicate record is a no-op");

        let reloaded = DownloadLedger::load(dir.path(), 4).expect("reload ledger");
        assert!(reloaded.contains("abc123"));
        let raw = fs::read_to_string(reloaded.path()).expect("read ledger");
        assert_eq!(raw, "youtube abc123\n");
    }

    #[test]
    fn record_does_not_duplicate_ids_written_by_fetcher() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut ledger = DownloadLedger::load(dir.path(), 2).expect("load ledger");
        fs::write(ledger.path(), "youtube xyz\n").expect("simulate fetcher write");

        ledger.record("xyz").expect("record id");

        let raw = fs::read_to_string(ledger.path()).expect("read ledger");
        assert_eq!(raw, "youtube xyz\n");
        assert!(ledger.contains("xyz"));
    }
}
