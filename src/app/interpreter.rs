use url::Url;

use super::library::Library;
use super::model::{AliasRecord, Name, SeriesRecord};
use super::session::Session;

/// Result of one input line: the next session and library, plus an optional
/// message for the next redraw. Commands that merely fail their precondition
/// return the state untouched with a message explaining why.
pub(crate) type Step = (Session, Library, Option<String>);

/// Map one raw input line to the next program state. Blank input is a pure
/// no-op; anything else dispatches through the command table below.
pub(crate) fn interpret(session: Session, library: Library, input: &str) -> Step {
    match parse(input) {
        None => (session, library, None),
        Some(command) => dispatch(command, session, library),
    }
}

/// The closed command set, keyed by `(token, has-parameter)`. Token/arity
/// combinations outside the table collapse into `Unsupported`, which carries
/// the normalized echo for the error message.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Increment,
    Decrement,
    Add(Option<String>),
    Alias(Option<String>),
    Backlog,
    Episodes(Option<String>),
    Exit,
    Finish,
    Help,
    List,
    Random,
    Remove(Option<String>),
    Stream(Option<String>),
    Watch(Option<String>),
    Watched(Option<String>),
    Unsupported(String),
}

fn parse(input: &str) -> Option<Command> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (token, parameter) = match trimmed.split_once(' ') {
        Some((token, rest)) => (token, Some(rest.trim())),
        None => (trimmed, None),
    };
    let command = token.to_lowercase();
    let parameter = parameter.filter(|rest| !rest.is_empty());

    Some(match (command.as_str(), parameter) {
        ("++", None) => Command::Increment,
        ("--", None) => Command::Decrement,
        ("add", parameter) => Command::Add(parameter.map(str::to_string)),
        ("alias", parameter) => Command::Alias(parameter.map(str::to_string)),
        ("backlog", None) => Command::Backlog,
        ("episodes", parameter) => Command::Episodes(parameter.map(str::to_string)),
        ("exit", None) => Command::Exit,
        ("finish", None) => Command::Finish,
        ("help", None) => Command::Help,
        ("list", None) => Command::List,
        ("random", None) => Command::Random,
        ("rm", parameter) => Command::Remove(parameter.map(str::to_string)),
        ("stream", parameter) => Command::Stream(parameter.map(str::to_string)),
        ("watch", parameter) => Command::Watch(parameter.map(str::to_string)),
        ("watched", parameter) => Command::Watched(parameter.map(str::to_string)),
        (_, parameter) => Command::Unsupported(match parameter {
            Some(rest) => format!("{command} {}", rest.to_lowercase()),
            None => command.clone(),
        }),
    })
}

fn dispatch(command: Command, session: Session, library: Library) -> Step {
    match command {
        Command::Increment => increment_watched(session, library),
        Command::Decrement => decrement_watched(session, library),
        Command::Add(parameter) => add_series(session, library, parameter),
        Command::Alias(parameter) => set_alias(session, library, parameter),
        Command::Backlog => {
            let session = Session {
                in_backlog: true,
                ..session
            };
            (session, library, None)
        }
        Command::Episodes(parameter) => set_episodes(session, library, parameter),
        Command::Exit => {
            let session = Session {
                wants_exit: true,
                ..session
            };
            (session, library, None)
        }
        Command::Finish => finish_watching(session, library),
        Command::Help => (session, library, Some(HELP_TEXT.to_string())),
        Command::List => {
            let session = Session {
                in_backlog: false,
                ..session
            };
            (session, library, None)
        }
        Command::Random => watch_random(session, library),
        Command::Remove(parameter) => remove_series(session, library, parameter),
        Command::Stream(parameter) => match parameter {
            Some(uri) => set_stream(session, library, &uri),
            None => open_stream(session, library),
        },
        Command::Watch(parameter) => watch_series(session, library, parameter),
        Command::Watched(parameter) => set_watched(session, library, parameter),
        Command::Unsupported(echo) => {
            let message = format!(
                "The command '{echo}' is unsupported. Type 'help' for a list of supported commands."
            );
            (session, library, Some(message))
        }
    }
}

fn reply(session: Session, library: Library, message: &str) -> Step {
    (session, library, Some(message.to_string()))
}

/// Store a rewritten currently-watched record in all three places it lives:
/// the session cursor, every queue entry and the backlog.
fn sync_watching(session: Session, library: Library, old: &SeriesRecord, new: SeriesRecord) -> Step {
    let Library {
        queue,
        backlog,
        aliases,
    } = library;
    let library = Library {
        queue: queue.replace_all(old, &new),
        backlog: backlog.replace(old, &new),
        aliases,
    };
    let session = Session {
        watching: Some(new),
        ..session
    };
    (session, library, None)
}

/// Strict non-negative decimal: digits only, so signs, fractions and
/// anything a lenient integer parser would let through all fail.
fn parse_count(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn increment_watched(session: Session, library: Library) -> Step {
    let Some(series) = session.watching.clone() else {
        return reply(
            session,
            library,
            "Cannot increase watched count: not watching any series.",
        );
    };
    if series.episodes() > 0 && series.watched() == series.episodes() {
        return reply(
            session,
            library,
            "Cannot increase watched count: total amount of episodes has already been watched.",
        );
    }
    match series.clone().with_watched(series.watched() + 1) {
        Ok(updated) => sync_watching(session, library, &series, updated),
        Err(_) => (session, library, None),
    }
}

fn decrement_watched(session: Session, library: Library) -> Step {
    let Some(series) = session.watching.clone() else {
        return reply(
            session,
            library,
            "Cannot decrease watched count: not watching any series.",
        );
    };
    if series.watched() == 0 {
        return reply(
            session,
            library,
            "Cannot decrease watched count: watched count cannot be set below zero.",
        );
    }
    match series.clone().with_watched(series.watched() - 1) {
        Ok(updated) => sync_watching(session, library, &series, updated),
        Err(_) => (session, library, None),
    }
}

fn add_series(session: Session, library: Library, parameter: Option<String>) -> Step {
    let Some(name) = parameter else {
        return reply(
            session,
            library,
            "Please specify the name or an alias of the series to be added to the list.",
        );
    };
    (session, library.add_series_with_name(&name), None)
}

fn set_alias(session: Session, library: Library, parameter: Option<String>) -> Step {
    let Some(watching) = session.watching.clone() else {
        return reply(session, library, "Cannot set alias: not watching any series.");
    };
    let Some(parameter) = parameter else {
        return reply(session, library, "Please specify the alias.");
    };
    let Ok(alias) = Name::new(&parameter) else {
        return (session, library, None);
    };
    let message = format!(
        "Added alias '{}' to series '{}'.",
        parameter.to_lowercase(),
        watching.name()
    );
    let Library {
        queue,
        backlog,
        aliases,
    } = library;
    let library = Library {
        queue,
        backlog,
        aliases: aliases.add(AliasRecord::new(alias, watching.name().clone())),
    };
    (session, library, Some(message))
}

fn set_episodes(session: Session, library: Library, parameter: Option<String>) -> Step {
    let Some(parameter) = parameter else {
        return match session.watching {
            None => reply(
                session,
                library,
                "Cannot set episode count: not watching any series.",
            ),
            Some(_) => reply(session, library, "Please specify the total amount of episodes."),
        };
    };
    let Some(series) = session.watching.clone() else {
        return reply(
            session,
            library,
            "Cannot set total episode count: not watching any series.",
        );
    };
    let Some(amount) = parse_count(&parameter) else {
        return reply(
            session,
            library,
            "Cannot set total episode count: parameter must be a positive whole number.",
        );
    };
    if series.watched() > amount {
        return reply(
            session,
            library,
            "Cannot set total episode count: amount of episodes cannot be less than the amount \
             of watched episodes.",
        );
    }
    match series.clone().with_episodes(amount) {
        Ok(updated) => sync_watching(session, library, &series, updated),
        Err(_) => (session, library, None),
    }
}

fn finish_watching(session: Session, library: Library) -> Step {
    let Some(series) = session.watching.clone() else {
        return reply(
            session,
            library,
            "Cannot finish watching: not watching any series.",
        );
    };
    let Library {
        queue,
        backlog,
        aliases,
    } = library;
    let library = Library {
        queue: queue.remove_all(&series),
        backlog,
        aliases,
    };
    let session = Session {
        watching: None,
        ..session
    };
    (session, library, None)
}

fn watch_random(session: Session, library: Library) -> Step {
    if library.queue.is_empty() {
        return reply(session, library, "Cannot choose random from an empty list.");
    }
    let picked = library.queue.get(fastrand::usize(..library.queue.len())).cloned();
    let session = Session {
        watching: picked,
        ..session
    };
    (session, library, None)
}

fn remove_series(session: Session, library: Library, parameter: Option<String>) -> Step {
    let Some(parameter) = parameter else {
        return reply(
            session,
            library,
            "Please specify the name or an alias of the series to be removed from the list.",
        );
    };
    if library.queue.is_empty() {
        return reply(session, library, "Cannot remove from an empty list.");
    }
    let Ok(name) = Name::new(&parameter) else {
        return (session, library, None);
    };
    let resolved = library.aliases.resolve(&name).cloned().unwrap_or_else(|| name.clone());
    let Some(series) = library.queue.find_by_name(&resolved).cloned() else {
        // Echo the name as typed, not its resolution.
        let message = format!(
            "Series with the name or alias '{}' was not found in the list.",
            name.key()
        );
        return reply(session, library, &message);
    };
    let mut session = session;
    if session.watching.as_ref() == Some(&series) {
        session.watching = None;
    }
    let Library {
        queue,
        backlog,
        aliases,
    } = library;
    let library = Library {
        queue: queue.remove_all(&series),
        backlog,
        aliases,
    };
    (session, library, None)
}

fn open_stream(session: Session, library: Library) -> Step {
    let Some(watching) = session.watching.clone() else {
        return reply(session, library, "Cannot open stream: not watching any series.");
    };
    let Some(stream) = watching.stream().cloned() else {
        return reply(
            session,
            library,
            "Cannot open stream: watched series does not have a stream source.",
        );
    };
    let session = Session {
        open_stream: Some(stream),
        ..session
    };
    (session, library, None)
}

fn set_stream(session: Session, library: Library, uri: &str) -> Step {
    let Some(series) = session.watching.clone() else {
        return reply(session, library, "Cannot set stream: not watching any series.");
    };
    let Ok(stream) = Url::parse(uri) else {
        return reply(session, library, "Cannot set stream: the URI is malformed.");
    };
    let updated = series.clone().with_stream(Some(stream));
    sync_watching(session, library, &series, updated)
}

fn watch_series(session: Session, library: Library, parameter: Option<String>) -> Step {
    if library.queue.is_empty() {
        return reply(session, library, "Cannot watch from an empty list.");
    }
    let Some(parameter) = parameter else {
        return reply(
            session,
            library,
            "Please specify the name or an alias of the series you want to watch.",
        );
    };
    let Ok(name) = Name::new(&parameter) else {
        return (session, library, None);
    };
    let resolved = library.aliases.resolve(&name).cloned().unwrap_or(name);
    let Some(series) = library.queue.find_by_name(&resolved).cloned() else {
        let message = format!(
            "Series with the name or alias '{}' was not found in the list.",
            resolved.key()
        );
        return reply(session, library, &message);
    };
    let session = Session {
        watching: Some(series),
        ..session
    };
    (session, library, None)
}

fn set_watched(session: Session, library: Library, parameter: Option<String>) -> Step {
    let Some(series) = session.watching.clone() else {
        return reply(
            session,
            library,
            "Cannot set watched episode count: not watching any series.",
        );
    };
    let Some(parameter) = parameter else {
        return reply(session, library, "Please specify the amount of watched episodes.");
    };
    let Some(amount) = parse_count(&parameter) else {
        return reply(
            session,
            library,
            "Cannot set watched count: parameter must be a positive whole number.",
        );
    };
    if series.episodes() > 0 && amount > series.episodes() {
        return reply(
            session,
            library,
            "Cannot set watched count: watched count cannot be over the total episode count.",
        );
    }
    match series.clone().with_watched(amount) {
        Ok(updated) => sync_watching(session, library, &series, updated),
        Err(_) => (session, library, None),
    }
}

const HELP_TEXT: &str = concat!(
    "General commands",
    "\n\n  add <name/alias>",
    "\n     add a series with the given name to the list.",
    "\n     The name can also be an alias of a series.",
    "\n     If series with the given name or alias does not yet exist in the backlog,",
    "\n     a new series with the given name is created and added to both the list and the backlog.",
    "\n\n  exit",
    "\n     exit the program.",
    "\n\n  random",
    "\n     pick a random series from the list for watching.",
    "\n\n  rm <name/alias>",
    "\n     remove a series with the given name or alias from the list.",
    "\n     All of its data will still be stored in the backlog.",
    "\n\n  watch <name/alias>",
    "\n     start watching a series from the list with the given name or alias.",
    "\n\nNavigation commands",
    "\n\n  backlog",
    "\n     change the view mode to backlog.",
    "\n\n  list",
    "\n     change the view mode to list.",
    "\n\nCommands usable when watching a series",
    "\n\n  ++",
    "\n     increase the amount of watched episodes of the series being watched by one.",
    "\n     Does nothing if the amount of watched episodes is equal to the total amount of episodes.",
    "\n\n  --",
    "\n     decrease the amount of watched episodes of the series being watched by one.",
    "\n     Does nothing if the amount of watched episodes is zero.",
    "\n\n  alias <alias>",
    "\n     adds an alias to the currently watched series.",
    "\n\n  episodes <number>",
    "\n     sets the total episode count of the currently watched series.",
    "\n     Cannot be smaller than the amount of watched episodes.",
    "\n\n  finish",
    "\n     finish watching the current series and remove it from the list.",
    "\n\n  stream",
    "\n     open the stream of the series.",
    "\n     Does nothing if no stream-source is set.",
    "\n\n  stream <uri>",
    "\n     set the stream-source of the series.",
    "\n     Can also be a local file despite the name.",
    "\n\n  watched <number>",
    "\n     set the amount of watched episodes of the series being watched.",
    "\n     If the total amount of episodes is set to non-zero, this cannot be larger than that amount.",
);
