use std::fmt;
use std::hash::{Hash, Hasher};

use thiserror::Error;
use url::Url;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub(crate) enum ModelError {
    #[error("name cannot be empty or whitespace")]
    InvalidName,

    #[error("watched count cannot exceed a non-zero episode count")]
    InvalidEpisodeRange,
}

/// Series identity: trimmed on construction, case-insensitive on comparison
/// and hashing. The original spelling is kept for display.
#[derive(Debug, Clone)]
pub(crate) struct Name(String);

impl Name {
    pub(crate) fn new(raw: &str) -> Result<Self, ModelError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidName);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased form used as the lookup key in every name-keyed collection.
    pub(crate) fn key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One tracked series. An immutable value: every `with_*` call builds a
/// replacement record, and the watched count may never exceed a non-zero
/// episode count. `episodes == 0` means the total is unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SeriesRecord {
    name: Name,
    episodes: u32,
    watched: u32,
    stream: Option<Url>,
}

impl SeriesRecord {
    pub(crate) fn new(name: Name) -> Self {
        Self {
            name,
            episodes: 0,
            watched: 0,
            stream: None,
        }
    }

    pub(crate) fn name(&self) -> &Name {
        &self.name
    }

    pub(crate) fn episodes(&self) -> u32 {
        self.episodes
    }

    pub(crate) fn watched(&self) -> u32 {
        self.watched
    }

    pub(crate) fn stream(&self) -> Option<&Url> {
        self.stream.as_ref()
    }

    pub(crate) fn with_episodes(self, episodes: u32) -> Result<Self, ModelError> {
        if episodes > 0 && episodes < self.watched {
            return Err(ModelError::InvalidEpisodeRange);
        }
        Ok(Self { episodes, ..self })
    }

    pub(crate) fn with_watched(self, watched: u32) -> Result<Self, ModelError> {
        if self.episodes > 0 && watched > self.episodes {
            return Err(ModelError::InvalidEpisodeRange);
        }
        Ok(Self { watched, ..self })
    }

    pub(crate) fn with_stream(self, stream: Option<Url>) -> Self {
        Self { stream, ..self }
    }
}

/// Alternate name for a series, resolving to its canonical name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AliasRecord {
    pub(crate) alias: Name,
    pub(crate) name: Name,
}

impl AliasRecord {
    pub(crate) fn new(alias: Name, name: Name) -> Self {
        Self { alias, name }
    }
}
