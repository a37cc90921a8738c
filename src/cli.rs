use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "tvtrack",
    version,
    about = "Track TV-series watch progress with single-line terminal commands"
)]
pub struct Cli {
    /// Directory holding the backlog, alias and watch-list files.
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}
