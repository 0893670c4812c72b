use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "sabbath-dl",
    version,
    about = "Download next week's Sabbath School lesson videos and daily audio"
)]
pub struct Cli {}
