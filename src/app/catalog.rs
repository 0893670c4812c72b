use std::path::Path;
use std::process::{Command as ProcessCommand, Output};

use serde_json::Value;
use tracing::debug;

use crate::error::CatalogError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VideoEntry {
    pub(crate) title: String,
    pub(crate) id: String,
}

/// Source of a channel's most recent uploads, newest first.
pub(crate) trait VideoCatalog {
    fn recent_videos(&self, channel_url: &str) -> Result<Vec<VideoEntry>, CatalogError>;
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct FetchRequest<'a> {
    pub(crate) url: &'a str,
    pub(crate) format_spec: &'a str,
    pub(crate) folder: &'a Path,
    pub(crate) ledger: &'a Path,
    pub(crate) lesson: u32,
}

/// Downloads one video into the lesson folder and records its id in the ledger.
pub(crate) trait VideoFetcher {
    fn fetch(&self, request: &FetchRequest<'_>) -> Result<(), CatalogError>;
}

pub(crate) fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

pub(crate) struct YtDlp {
    bin: String,
    depth: usize,
}

impl YtDlp {
    pub(crate) fn new(bin: &str, depth: usize) -> Self {
        Self {
            bin: bin.to_string(),
            depth,
        }
    }

    fn run(&self, cmd: &mut ProcessCommand) -> Result<Output, CatalogError> {
        let output = cmd.output().map_err(|source| CatalogError::Launch {
            bin: self.bin.clone(),
            source,
        })?;
        if output.status.success() {
            return Ok(output);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = stderr
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("no diagnostic output")
            .trim()
            .chars()
            .take(240)
            .collect::<String>();
        Err(CatalogError::Failed {
            bin: self.bin.clone(),
            status: output.status.to_string(),
            detail,
        })
    }
}

impl VideoCatalog for YtDlp {
    fn recent_videos(&self, channel_url: &str) -> Result<Vec<VideoEntry>, CatalogError> {
        let mut cmd = ProcessCommand::new(&self.bin);
        cmd.arg("--flat-playlist")
            .arg("--playlist-end")
            .arg(self.depth.to_string())
            .arg("--dump-single-json")
            .arg("--quiet")
            .arg("--no-warnings")
            .arg(channel_url);
        debug!("querying catalog: {cmd:?}");

        let output = self.run(&mut cmd)?;
        let raw = String::from_utf8(output.stdout)
            .map_err(|err| CatalogError::Parse(format!("non-UTF-8 output: {err}")))?;
        let mut entries = parse_playlist_entries(&raw)?;
        entries.truncate(self.depth);
        Ok(entries)
    }
}

impl VideoFetcher for YtDlp {
    fn fetch(&self, request: &FetchRequest<'_>) -> Result<(), CatalogError> {
        let template = request.folder.join("%(title)s.%(ext)s");
        let mut cmd = ProcessCommand::new(&self.bin);
        cmd.arg("--format")
            .arg(request.format_spec)
            .arg("--output")
            .arg(&template)
            .arg("--download-archive")
            .arg(request.ledger)
            .arg("--quiet")
            .arg("--no-warnings")
            .arg(request.url);
        debug!("fetching lesson {} video: {cmd:?}", request.lesson);

        self.run(&mut cmd).map(|_| ())
    }
}

/// Entries without an id cannot be fetched and are dropped; a missing title
/// becomes empty so it simply never matches.
pub(crate) fn parse_playlist_entries(raw: &str) -> Result<Vec<VideoEntry>, CatalogError> {
    let parsed: Value =
        serde_json::from_str(raw).map_err(|err| CatalogError::Parse(err.to_string()))?;
    let Some(entries) = parsed.get("entries").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    Ok(entries
        .iter()
        .filter_map(|entry| {
            let id = entry.get("id")?.as_str()?.trim();
            if id.is_empty() {
                return None;
            }
            let title = entry
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .trim();
            Some(VideoEntry {
                title: title.to_string(),
                id: id.to_string(),
            })
        })
        .collect())
}
