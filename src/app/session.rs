use url::Url;

use super::model::SeriesRecord;

/// Cursor state threaded through every command. The currently-watched record
/// is held by value, so any command that rewrites that series must store the
/// replacement here as well as in the queue and backlog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Session {
    pub(crate) wants_exit: bool,
    pub(crate) watching: Option<SeriesRecord>,
    pub(crate) in_backlog: bool,
    /// Stream locator the caller should hand to the OS, then clear.
    pub(crate) open_stream: Option<Url>,
}
