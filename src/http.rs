use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::error::HttpError;

/// Single-attempt HTTP client for the audio archive. No retries: a failed
/// request is reported to the caller and the sweep moves on.
pub(crate) struct HttpClient {
    agent: ureq::Agent,
}

impl HttpClient {
    pub(crate) fn new(connect_timeout: Duration, read_timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(connect_timeout)
            .timeout_read(read_timeout)
            .timeout_write(read_timeout)
            .build();
        Self { agent }
    }

    /// `Ok(false)` means the server answered but the resource is not there.
    pub(crate) fn exists(&self, url: &str) -> Result<bool, HttpError> {
        match self.agent.head(url).call() {
            Ok(_) => Ok(true),
            Err(ureq::Error::Status(status, _)) => {
                debug!("HEAD {url} answered HTTP status {status}");
                Ok(false)
            }
            Err(ureq::Error::Transport(err)) => Err(HttpError::Transport(err.to_string())),
        }
    }

    /// Streams the body into `dest`. The bytes land in a sibling `.part` file
    /// first so `dest` only ever exists complete.
    pub(crate) fn download_to(&self, url: &str, dest: &Path) -> Result<u64, HttpError> {
        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(status, _)) => return Err(HttpError::Status(status)),
            Err(ureq::Error::Transport(err)) => {
                return Err(HttpError::Transport(err.to_string()));
            }
        };

        let partial = partial_path(dest);
        let written = match write_body(response.into_reader(), &partial) {
            Ok(written) => written,
            Err(err) => {
                let _ = fs::remove_file(&partial);
                return Err(err.into());
            }
        };
        fs::rename(&partial, dest)?;
        Ok(written)
    }
}

fn write_body(mut reader: impl io::Read, path: &Path) -> io::Result<u64> {
    let mut file = File::create(path)?;
    let written = io::copy(&mut reader, &mut file)?;
    file.sync_all()?;
    Ok(written)
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}
