mod app;
mod cli;
mod config;
mod error;
mod http;
mod logging;
mod paths;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    logging::init();
    app::run(cli, config::AppConfig::default())
}
