// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Total coercion of untrusted oracle output into a [`ParsedIntent`].
//!
//! The payload is first read into a loosely-typed [`RawIntent`] whose
//! fields are plain JSON values, then every field is checked on its own.
//! Nothing here returns an error: out-of-contract values are clamped,
//! defaulted or dropped.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use secretary_kanban::{PriorityLevel, WorkflowMode};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::model::{Effort, IntentFields, IntentKind, ParsedIntent, TaskRefHint};

/// Confidence assumed when the oracle omits it or sends a non-number.
const DEFAULT_CONFIDENCE: u8 = 50;

static DUE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("static regex"));

/// Top-level oracle payload before any field is trusted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawIntent {
    intent: Value,
    confidence: Value,
    task_ref: Value,
    fields: Value,
}

/// Validates oracle payloads against the configured board.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentValidator {
    mode: WorkflowMode,
}

impl IntentValidator {
    pub fn new(mode: WorkflowMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> WorkflowMode {
        self.mode
    }

    /// Parse and validate the raw text returned by the intent oracle.
    ///
    /// Blank or malformed JSON becomes a synthetic no-op with confidence 0
    /// and the failure reason in `notes`.
    pub fn from_oracle_output(&self, raw: &str) -> ParsedIntent {
        let raw = raw.trim();
        if raw.is_empty() {
            return ParsedIntent::noop("oracle returned no content");
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => self.validate(&value),
            Err(e) => {
                warn!(error = %e, "oracle output is not valid JSON");
                ParsedIntent::noop(format!("malformed oracle output: {e}"))
            }
        }
    }

    /// Coerce an already-parsed JSON value. Non-object payloads are a no-op
    /// with confidence 0.
    pub fn validate(&self, raw: &Value) -> ParsedIntent {
        if !raw.is_object() {
            return ParsedIntent::noop("oracle payload is not a JSON object");
        }
        let raw: RawIntent = serde_json::from_value(raw.clone()).unwrap_or_default();

        ParsedIntent {
            kind: coerce_kind(&raw.intent),
            confidence: coerce_confidence(&raw.confidence),
            task_ref: coerce_task_ref(&raw.task_ref),
            fields: self.coerce_fields(&raw.fields),
        }
    }

    fn coerce_fields(&self, fields: &Value) -> IntentFields {
        IntentFields {
            title: text(fields.get("title")),
            notes: text(fields.get("notes")),
            due_date: fields
                .get("due_date")
                .and_then(Value::as_str)
                .filter(|d| DUE_DATE.is_match(d))
                .map(str::to_string),
            tags: fields
                .get("tags")
                .and_then(Value::as_array)
                .map(|tags| tags.iter().filter_map(|t| text(Some(t))).collect())
                .unwrap_or_default(),
            effort: fields
                .get("effort")
                .and_then(Value::as_str)
                .and_then(|e| Effort::from_str(e).ok()),
            status: fields
                .get("status")
                .and_then(Value::as_str)
                .and_then(|s| self.mode.parse_label(s)),
            importance: PriorityLevel::from_label(fields.get("importance").and_then(Value::as_str)),
            urgency: PriorityLevel::from_label(fields.get("urgency").and_then(Value::as_str)),
        }
    }
}

fn coerce_kind(raw: &Value) -> IntentKind {
    raw.as_str()
        .and_then(|s| IntentKind::from_str(s).ok())
        .unwrap_or(IntentKind::NoOp)
}

fn coerce_confidence(raw: &Value) -> u8 {
    match raw.as_f64() {
        Some(n) => n.clamp(0.0, 100.0).round() as u8,
        None => DEFAULT_CONFIDENCE,
    }
}

fn coerce_task_ref(raw: &Value) -> TaskRefHint {
    TaskRefHint {
        task_id: text(raw.get("task_id")).or_else(|| text(raw.get("notion_page_id"))),
        title_guess: text(raw.get("title_guess")),
    }
}

/// Non-blank string, trimmed. Anything else is absent.
fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secretary_kanban::{PriorityState, SimpleState, WorkflowState};
    use serde_json::json;

    fn simple() -> IntentValidator {
        IntentValidator::new(WorkflowMode::Simple)
    }

    #[test]
    fn full_payload_passes_through() {
        let intent = simple().validate(&json!({
            "intent": "create_task",
            "confidence": 92,
            "task_ref": {"task_id": null, "title_guess": null},
            "fields": {
                "title": "pay electricity bill",
                "notes": "before friday",
                "due_date": "2026-03-01",
                "tags": ["Financeiro"],
                "effort": "S",
                "status": "Backlog"
            }
        }));
        assert_eq!(intent.kind, IntentKind::CreateTask);
        assert_eq!(intent.confidence, 92);
        assert_eq!(intent.fields.title.as_deref(), Some("pay electricity bill"));
        assert_eq!(intent.fields.due_date.as_deref(), Some("2026-03-01"));
        assert_eq!(intent.fields.tags, vec!["Financeiro".to_string()]);
        assert_eq!(intent.fields.effort, Some(Effort::S));
        assert_eq!(intent.fields.status, Some(WorkflowState::Simple(SimpleState::Backlog)));
    }

    #[test]
    fn blank_and_malformed_output_is_noop_zero() {
        for raw in ["", "   ", "{not json", "```json\n{}\n```"] {
            let intent = simple().from_oracle_output(raw);
            assert_eq!(intent.kind, IntentKind::NoOp, "{raw:?}");
            assert_eq!(intent.confidence, 0, "{raw:?}");
            assert!(intent.fields.notes.is_some());
        }
    }

    #[test]
    fn non_object_payload_is_noop_zero() {
        for raw in [json!(null), json!([1, 2]), json!("create_task"), json!(7)] {
            let intent = simple().validate(&raw);
            assert_eq!(intent.kind, IntentKind::NoOp);
            assert_eq!(intent.confidence, 0);
        }
    }

    #[test]
    fn empty_object_gets_field_defaults() {
        let intent = simple().validate(&json!({}));
        assert_eq!(intent.kind, IntentKind::NoOp);
        assert_eq!(intent.confidence, 50);
        assert!(intent.fields.tags.is_empty());
        assert_eq!(intent.task_ref, TaskRefHint::default());
    }

    #[test]
    fn unknown_kind_becomes_noop() {
        let intent = simple().validate(&json!({"intent": "delete_everything", "confidence": 99}));
        assert_eq!(intent.kind, IntentKind::NoOp);
        assert_eq!(intent.confidence, 99);
    }

    #[test]
    fn confidence_is_clamped_or_defaulted() {
        let v = simple();
        assert_eq!(v.validate(&json!({"confidence": -5})).confidence, 0);
        assert_eq!(v.validate(&json!({"confidence": 150})).confidence, 100);
        assert_eq!(v.validate(&json!({"confidence": 72.6})).confidence, 73);
        assert_eq!(v.validate(&json!({"confidence": "90"})).confidence, 50);
        assert_eq!(v.validate(&json!({"confidence": null})).confidence, 50);
    }

    #[test]
    fn due_date_must_match_strictly() {
        let v = simple();
        let due = |d: Value| v.validate(&json!({"fields": {"due_date": d}})).fields.due_date;
        assert_eq!(due(json!("2026-12-31")), Some("2026-12-31".into()));
        assert_eq!(due(json!("2026-1-31")), None);
        assert_eq!(due(json!("31/12/2026")), None);
        assert_eq!(due(json!("2026-12-31T10:00")), None);
        assert_eq!(due(json!(20261231)), None);
        assert_eq!(due(json!("٢٠٢٦-٠١-٠١")), None);
        assert_eq!(due(json!("２０２６-０１-０１")), None);
        assert_eq!(due(json!(" 2026-01-01\n")), None);
        assert_eq!(due(json!("2026-01-01 ")), None);
    }

    #[test]
    fn effort_and_status_are_exact() {
        let v = simple();
        let fields = v
            .validate(&json!({"fields": {"effort": "small", "status": "in progress"}}))
            .fields;
        assert_eq!(fields.effort, None);
        assert_eq!(fields.status, None);

        let fields = v
            .validate(&json!({"fields": {"effort": "L", "status": "Em Andamento"}}))
            .fields;
        assert_eq!(fields.effort, Some(Effort::L));
        assert_eq!(fields.status, Some(WorkflowState::Simple(SimpleState::InProgress)));
    }

    #[test]
    fn status_is_checked_against_configured_board() {
        let raw = json!({"fields": {"status": "DONE"}});
        assert_eq!(simple().validate(&raw).fields.status, None);
        assert_eq!(
            IntentValidator::new(WorkflowMode::Priority).validate(&raw).fields.status,
            Some(WorkflowState::Priority(PriorityState::Done))
        );
    }

    #[test]
    fn missing_or_odd_tags_become_empty_list() {
        let v = simple();
        assert!(v.validate(&json!({"fields": {}})).fields.tags.is_empty());
        assert!(v.validate(&json!({"fields": {"tags": "work"}})).fields.tags.is_empty());
        assert_eq!(
            v.validate(&json!({"fields": {"tags": ["work", 3, "", null, "home"]}})).fields.tags,
            vec!["work".to_string(), "home".to_string()]
        );
    }

    #[test]
    fn task_ref_accepts_legacy_key_and_drops_blanks() {
        let v = simple();
        let hint = v
            .validate(&json!({"task_ref": {"notion_page_id": "abc", "title_guess": "  "}}))
            .task_ref;
        assert_eq!(hint.task_id.as_deref(), Some("abc"));
        assert_eq!(hint.title_guess, None);
    }

    #[test]
    fn importance_and_urgency_are_strict() {
        let fields = simple()
            .validate(&json!({"fields": {"importance": "High", "urgency": "urgent"}}))
            .fields;
        assert_eq!(fields.importance, PriorityLevel::High);
        assert_eq!(fields.urgency, PriorityLevel::Unset);
    }

    proptest::proptest! {
        #[test]
        fn any_number_lands_in_range(n in proptest::num::f64::NORMAL) {
            let c = simple().validate(&json!({"confidence": n})).confidence;
            proptest::prop_assert!(c <= 100);
        }
    }
}
