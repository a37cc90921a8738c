use std::collections::BTreeMap;

use super::model::{AliasRecord, Name, SeriesRecord};

/// The active watch list: ordered, and the same series may be queued more
/// than once. Replacement and removal match on full structural equality;
/// the interpreter's lockstep writes keep that equivalent to matching by
/// name, so every duplicate moves together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct WatchQueue {
    entries: Vec<SeriesRecord>,
}

impl WatchQueue {
    pub(crate) fn add(mut self, series: SeriesRecord) -> Self {
        self.entries.push(series);
        self
    }

    pub(crate) fn find_by_name(&self, name: &Name) -> Option<&SeriesRecord> {
        self.entries.iter().find(|series| series.name() == name)
    }

    pub(crate) fn replace_all(mut self, old: &SeriesRecord, new: &SeriesRecord) -> Self {
        if old == new {
            return self;
        }
        for entry in &mut self.entries {
            if entry == old {
                *entry = new.clone();
            }
        }
        self
    }

    pub(crate) fn remove_all(mut self, series: &SeriesRecord) -> Self {
        self.entries.retain(|entry| entry != series);
        self
    }

    pub(crate) fn get(&self, index: usize) -> Option<&SeriesRecord> {
        self.entries.get(index)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &SeriesRecord> {
        self.entries.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Canonical store of every series ever known, at most one record per name.
/// Keyed by the lowercased name so lookups, rendering and serialization all
/// see one deterministic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Backlog {
    entries: BTreeMap<String, SeriesRecord>,
}

impl Backlog {
    /// First write wins; adding a name the backlog already knows is a no-op.
    pub(crate) fn add(mut self, series: SeriesRecord) -> Self {
        self.entries.entry(series.name().key()).or_insert(series);
        self
    }

    pub(crate) fn find_by_name(&self, name: &Name) -> Option<&SeriesRecord> {
        self.entries.get(&name.key())
    }

    /// Swap the record stored under `old`'s name for `new`, keyed by `new`'s
    /// name. A no-op when `old` is unknown.
    pub(crate) fn replace(mut self, old: &SeriesRecord, new: &SeriesRecord) -> Self {
        if self.entries.remove(&old.name().key()).is_some() {
            self.entries.insert(new.name().key(), new.clone());
        }
        self
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &SeriesRecord> {
        self.entries.values()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Alias -> canonical name lookup. Re-adding an alias overwrites whatever it
/// pointed at before.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct AliasTable {
    entries: BTreeMap<String, AliasRecord>,
}

impl AliasTable {
    pub(crate) fn add(mut self, record: AliasRecord) -> Self {
        self.entries.insert(record.alias.key(), record);
        self
    }

    pub(crate) fn resolve(&self, alias: &Name) -> Option<&Name> {
        self.entries.get(&alias.key()).map(|record| &record.name)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &AliasRecord> {
        self.entries.values()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The whole data model: watch queue, backlog and alias table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Library {
    pub(crate) queue: WatchQueue,
    pub(crate) backlog: Backlog,
    pub(crate) aliases: AliasTable,
}

impl Library {
    /// Queue a series under the given name. Aliases resolve to their
    /// canonical name first; a name the backlog already knows is copied from
    /// there, anything else becomes a fresh record in both collections.
    pub(crate) fn add_series_with_name(self, raw: &str) -> Self {
        let Ok(name) = Name::new(raw) else {
            return self;
        };
        let Library {
            queue,
            backlog,
            aliases,
        } = self;
        let name = aliases.resolve(&name).cloned().unwrap_or(name);
        match backlog.find_by_name(&name).cloned() {
            Some(series) => Library {
                queue: queue.add(series),
                backlog,
                aliases,
            },
            None => {
                let series = SeriesRecord::new(name);
                Library {
                    queue: queue.add(series.clone()),
                    backlog: backlog.add(series),
                    aliases,
                }
            }
        }
    }
}
