use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "sabbath_dl=info,warn";

/// Console narration goes to stdout; the level column (INFO/WARN) is the marker.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_target(false)
        .without_time()
        .init();
}
