use std::path::PathBuf;

use anyhow::{Context, Result};

pub struct DataFiles {
    pub backlog: PathBuf,
    pub aliases: PathBuf,
    /// Watch-queue scratch file; removed again on clean exit.
    pub queue: PathBuf,
}

pub fn data_files(override_dir: Option<PathBuf>) -> Result<DataFiles> {
    let base = match override_dir {
        Some(dir) => dir,
        None => dirs::data_dir()
            .context("unable to resolve data directory")?
            .join("tvtrack"),
    };
    Ok(DataFiles {
        backlog: base.join("backlog.json"),
        aliases: base.join("aliases.json"),
        queue: base.join("queue.tmp.json"),
    })
}
