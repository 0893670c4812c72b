use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to launch {bin}: {source}")]
    Launch {
        bin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{bin} exited with {status}: {detail}")]
    Failed {
        bin: String,
        status: String,
        detail: String,
    },
    #[error("unreadable catalog output: {0}")]
    Parse(String),
}
