// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping between task payloads and Notion page properties.
//!
//! The database is expected to expose these columns: `Name` (title),
//! `Status`, `Eisenhower`, `Importance`, `Urgency`, `Effort` (selects),
//! `Due` (date), `Notes`, `Source` (rich text), `Confidence` (number) and
//! `Tags` (multi-select).

use serde::Deserialize;
use serde_json::{Map, Value, json};

use secretary_core::{RemoteTask, TaskDraft, TaskPatch};

pub const NAME: &str = "Name";
pub const STATUS: &str = "Status";
pub const PRIORITY: &str = "Eisenhower";
pub const IMPORTANCE: &str = "Importance";
pub const URGENCY: &str = "Urgency";
pub const DUE: &str = "Due";
pub const NOTES: &str = "Notes";
pub const SOURCE: &str = "Source";
pub const CONFIDENCE: &str = "Confidence";
pub const TAGS: &str = "Tags";
pub const EFFORT: &str = "Effort";

/// Notion rejects rich text items longer than this.
const MAX_TEXT_CHARS: usize = 2000;

/// Properties for a new page.
pub fn draft_properties(draft: &TaskDraft) -> Map<String, Value> {
    let mut props = Map::new();
    props.insert(NAME.into(), title(&draft.title));
    props.insert(STATUS.into(), select(draft.state.label()));
    if let Some(category) = draft.priority {
        props.insert(PRIORITY.into(), select(&category.to_string()));
    }
    if let Some(label) = draft.importance.label() {
        props.insert(IMPORTANCE.into(), select(label));
    }
    if let Some(label) = draft.urgency.label() {
        props.insert(URGENCY.into(), select(label));
    }
    if let Some(due) = &draft.due_date {
        props.insert(DUE.into(), date(due));
    }
    if let Some(notes) = &draft.notes {
        props.insert(NOTES.into(), rich_text(notes));
    }
    props.insert(SOURCE.into(), rich_text(&draft.source));
    props.insert(CONFIDENCE.into(), json!({ "number": draft.confidence }));
    if !draft.tags.is_empty() {
        props.insert(TAGS.into(), multi_select(&draft.tags));
    }
    if let Some(effort) = &draft.effort {
        props.insert(EFFORT.into(), select(effort));
    }
    props
}

/// Properties for a partial update. Only supplied fields appear.
pub fn patch_properties(patch: &TaskPatch) -> Map<String, Value> {
    let mut props = Map::new();
    if let Some(t) = &patch.title {
        props.insert(NAME.into(), title(t));
    }
    if let Some(state) = patch.state {
        props.insert(STATUS.into(), select(state.label()));
    }
    if let Some(category) = patch.priority {
        props.insert(PRIORITY.into(), select(&category.to_string()));
    }
    if let Some(label) = patch.importance.and_then(|l| l.label()) {
        props.insert(IMPORTANCE.into(), select(label));
    }
    if let Some(label) = patch.urgency.and_then(|l| l.label()) {
        props.insert(URGENCY.into(), select(label));
    }
    if let Some(due) = &patch.due_date {
        props.insert(DUE.into(), date(due));
    }
    if let Some(notes) = &patch.notes {
        props.insert(NOTES.into(), rich_text(notes));
    }
    if let Some(tags) = patch.tags.as_ref().filter(|t| !t.is_empty()) {
        props.insert(TAGS.into(), multi_select(tags));
    }
    if let Some(effort) = &patch.effort {
        props.insert(EFFORT.into(), select(effort));
    }
    props
}

fn title(text: &str) -> Value {
    json!({ "title": [{ "text": { "content": clip(text) } }] })
}

fn rich_text(text: &str) -> Value {
    json!({ "rich_text": [{ "text": { "content": clip(text) } }] })
}

fn select(name: &str) -> Value {
    json!({ "select": { "name": name } })
}

fn date(start: &str) -> Value {
    json!({ "date": { "start": start } })
}

fn multi_select(names: &[String]) -> Value {
    let options: Vec<Value> = names.iter().map(|n| json!({ "name": n })).collect();
    json!({ "multi_select": options })
}

fn clip(text: &str) -> String {
    text.chars().take(MAX_TEXT_CHARS).collect()
}

/// A page object as returned by create, update and query.
#[derive(Debug, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Page {
    pub fn into_remote_task(self) -> RemoteTask {
        let title = self
            .properties
            .get(NAME)
            .and_then(|p| p.get("title"))
            .and_then(Value::as_array)
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p.get("plain_text").and_then(Value::as_str))
                    .collect::<String>()
            })
            .unwrap_or_default();
        let state_label = self
            .properties
            .get(STATUS)
            .and_then(|p| p.pointer("/select/name"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let due_date = self
            .properties
            .get(DUE)
            .and_then(|p| p.pointer("/date/start"))
            .and_then(Value::as_str)
            .map(str::to_string);

        RemoteTask {
            remote_id: self.id,
            url: self.url,
            title,
            state_label,
            due_date,
        }
    }
}

/// Body of a database query response.
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<Value>,
}

impl QueryResponse {
    /// Pages only; other result objects (e.g. partial pages) are skipped.
    pub fn into_tasks(self) -> Vec<RemoteTask> {
        self.results
            .into_iter()
            .filter(|r| r.get("properties").is_some())
            .filter_map(|r| serde_json::from_value::<Page>(r).ok())
            .map(Page::into_remote_task)
            .collect()
    }
}
