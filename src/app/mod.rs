mod interpreter;
mod library;
mod model;
mod render;
mod session;
mod storage;


use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::Command as ProcessCommand;

use anyhow::{Context, Result};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType, SetTitle};
use url::Url;

use crate::cli::Cli;
use crate::paths::{DataFiles, data_files};

use self::interpreter::interpret;
use self::library::Library;
use self::model::SeriesRecord;
use self::render::render_screen;
use self::session::Session;

const TITLE: &str = "tvtrack";
const FALLBACK_WIDTH: u16 = 80;

/// Read one line, interpret it, persist, redraw. All decisions live in the
/// interpreter; this loop only moves data between it, the disk and the
/// terminal.
pub fn run(cli: Cli) -> Result<()> {
    let files = data_files(cli.data_dir)?;
    let mut library = load_library(&files);
    let mut session = Session::default();

    let mut stdout = io::stdout();
    let _ = execute!(stdout, SetTitle(TITLE));
    redraw(&mut stdout, &session, &library, None)?;

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        line.clear();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("failed to read input")?;
        if read == 0 {
            // stdin closed; behave like `exit`.
            break;
        }

        let (next_session, next_library, message) = interpret(session, library, &line);
        session = next_session;
        library = next_library;
        persist(&files, &library);
        redraw(&mut stdout, &session, &library, message.as_deref())?;

        if session.wants_exit {
            break;
        }
        if let Some(stream) = session.open_stream.take() {
            open_stream(&stream);
        }
    }

    // The queue file only exists to survive a crash mid-session.
    let _ = fs::remove_file(&files.queue);
    Ok(())
}

fn load_library(files: &DataFiles) -> Library {
    Library {
        queue: storage::load_queue(&read_or_empty(&files.queue)),
        backlog: storage::load_backlog(&read_or_empty(&files.backlog)),
        aliases: storage::load_aliases(&read_or_empty(&files.aliases)),
    }
}

fn read_or_empty(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_default()
}

fn persist(files: &DataFiles, library: &Library) {
    write_or_warn(&files.queue, storage::serialize_series(library.queue.iter()));
    write_or_warn(&files.backlog, storage::serialize_series(library.backlog.iter()));
    write_or_warn(&files.aliases, storage::serialize_aliases(&library.aliases));
}

fn write_or_warn(path: &Path, content: String) {
    if let Some(parent) = path.parent()
        && let Err(err) = fs::create_dir_all(parent)
    {
        log::warn!("failed to create {}: {err}", parent.display());
        return;
    }
    if let Err(err) = fs::write(path, content) {
        log::warn!("failed to persist {}: {err}", path.display());
    }
}

fn redraw(
    stdout: &mut io::Stdout,
    session: &Session,
    library: &Library,
    message: Option<&str>,
) -> Result<()> {
    let width = crossterm::terminal::size()
        .map(|(width, _)| width)
        .unwrap_or(FALLBACK_WIDTH)
        .max(1);
    let rows: Vec<&SeriesRecord> = if session.in_backlog {
        library.backlog.iter().collect()
    } else {
        library.queue.iter().collect()
    };
    let screen = render_screen(TITLE, message, session.watching.as_ref(), &rows, width);
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0)).context("failed to clear terminal")?;
    writeln!(stdout, "{screen}").context("failed to write to terminal")?;
    stdout.flush().context("failed to flush terminal")?;
    Ok(())
}

/// Fire-and-forget: hand the locator to the platform opener and move on.
fn open_stream(stream: &Url) {
    #[cfg(target_os = "macos")]
    let spawned = ProcessCommand::new("open").arg(stream.as_str()).spawn();
    #[cfg(target_os = "windows")]
    let spawned = ProcessCommand::new("cmd")
        .args(["/C", "start", "", stream.as_str()])
        .spawn();
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let spawned = ProcessCommand::new("xdg-open").arg(stream.as_str()).spawn();

    if let Err(err) = spawned {
        log::warn!("failed to open stream {stream}: {err}");
    }
}
