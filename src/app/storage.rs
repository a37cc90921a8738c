use serde_json::{Value, json};
use url::Url;

use super::library::{AliasTable, Backlog, WatchQueue};
use super::model::{AliasRecord, Name, SeriesRecord};

/// Serialize an ordered run of series records as a human-readable JSON
/// document. Used for both the watch queue and the backlog; an empty
/// collection becomes the empty string.
pub(crate) fn serialize_series<'a>(series: impl Iterator<Item = &'a SeriesRecord>) -> String {
    let entries: Vec<Value> = series.map(series_value).collect();
    if entries.is_empty() {
        return String::new();
    }
    serde_json::to_string_pretty(&json!({ "series": entries })).unwrap_or_default()
}

pub(crate) fn serialize_aliases(aliases: &AliasTable) -> String {
    if aliases.is_empty() {
        return String::new();
    }
    let entries: Vec<Value> = aliases
        .iter()
        .map(|record| {
            json!({
                "alias": record.alias.as_str(),
                "name": record.name.as_str(),
            })
        })
        .collect();
    serde_json::to_string_pretty(&json!({ "aliases": entries })).unwrap_or_default()
}

fn series_value(series: &SeriesRecord) -> Value {
    let mut entry = json!({
        "name": series.name().as_str(),
        "episodes": series.episodes(),
        "watched": series.watched(),
    });
    if let (Some(stream), Some(map)) = (series.stream(), entry.as_object_mut()) {
        map.insert("stream".to_string(), Value::String(stream.to_string()));
    }
    entry
}

pub(crate) fn load_queue(text: &str) -> WatchQueue {
    let mut queue = WatchQueue::default();
    for series in parse_series_document(text) {
        queue = queue.add(series);
    }
    queue
}

pub(crate) fn load_backlog(text: &str) -> Backlog {
    let mut backlog = Backlog::default();
    for series in parse_series_document(text) {
        backlog = backlog.add(series);
    }
    backlog
}

pub(crate) fn load_aliases(text: &str) -> AliasTable {
    let mut aliases = AliasTable::default();
    let Some(entries) = document_entries(text, "aliases") else {
        return aliases;
    };
    for entry in entries {
        // A broken alias entry is dropped; the rest still load.
        let Some(record) = parse_alias_entry(&entry) else {
            continue;
        };
        aliases = aliases.add(record);
    }
    aliases
}

/// Loading never errors: blank or unparsable text is an empty collection,
/// and a series entry without a usable name discards the whole document.
fn parse_series_document(text: &str) -> Vec<SeriesRecord> {
    let Some(entries) = document_entries(text, "series") else {
        return Vec::new();
    };
    let mut parsed = Vec::new();
    for entry in entries {
        let Some(series) = parse_series_entry(&entry) else {
            return Vec::new();
        };
        parsed.push(series);
    }
    parsed
}

fn document_entries(text: &str, field: &str) -> Option<Vec<Value>> {
    if text.trim().is_empty() {
        return None;
    }
    let document: Value = serde_json::from_str(text).ok()?;
    document.get(field)?.as_array().cloned()
}

/// Field tolerance mirrors the persisted format's history: episodes, watched
/// and stream apply in that order and each falls back to its default when
/// unusable, so a watched count conflicting with the episode total is
/// dropped rather than the entry.
fn parse_series_entry(entry: &Value) -> Option<SeriesRecord> {
    let name = Name::new(entry.get("name")?.as_str()?).ok()?;
    let mut series = SeriesRecord::new(name);
    if let Some(episodes) = read_count(entry, "episodes")
        && let Ok(updated) = series.clone().with_episodes(episodes)
    {
        series = updated;
    }
    if let Some(watched) = read_count(entry, "watched")
        && let Ok(updated) = series.clone().with_watched(watched)
    {
        series = updated;
    }
    if let Some(stream) = entry.get("stream").and_then(Value::as_str)
        && let Ok(stream) = Url::parse(stream)
    {
        series = series.with_stream(Some(stream));
    }
    Some(series)
}

fn parse_alias_entry(entry: &Value) -> Option<AliasRecord> {
    let alias = Name::new(entry.get("alias")?.as_str()?).ok()?;
    let name = Name::new(entry.get("name")?.as_str()?).ok()?;
    Some(AliasRecord::new(alias, name))
}

fn read_count(entry: &Value, field: &str) -> Option<u32> {
    entry
        .get(field)
        .and_then(Value::as_u64)
        .and_then(|value| u32::try_from(value).ok())
}
